//! 股票看板后端服务
//! 
//! 提供个股概况、基本面、走势、分红、利润表、资讯及宏观侧栏的 RESTful API 服务
//! 数据来源：Yahoo Finance

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;

use crate::config::{AppConfig, ConfigSource};
use crate::handlers::AppState;
use crate::services::yahoo::YahooClient;

/// 应用程序入口
/// 
/// 加载配置后启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (config, source) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &source {
        ConfigSource::File(path) => log::info!("从 {} 加载配置", path),
        ConfigSource::Fallback { path, error } => {
            log::warn!("配置文件 {} 解析失败，使用默认配置: {}", path, error)
        }
        ConfigSource::Default => log::info!("未找到配置文件，使用默认配置"),
    }

    let client = YahooClient::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let state = web::Data::new(AppState {
        client,
        macro_indicators: config.macro_indicators.clone(),
    });

    let bind_addr = config.bind_addr();
    log::info!("启动股票看板后端服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
