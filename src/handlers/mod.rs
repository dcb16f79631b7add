pub mod stock;
pub mod dashboard;
pub mod health;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::MacroConfig;
use crate::error::FetchError;
use crate::models::ApiResponse;
use crate::services::yahoo::YahooClient;

/// 请求处理器共享状态
pub struct AppState {
    /// 数据源客户端
    pub client: YahooClient,
    /// 宏观侧栏配置
    pub macro_indicators: MacroConfig,
}

/// 错误类别映射为 HTTP 状态码
pub(crate) fn error_response<T: Serialize>(e: &FetchError) -> HttpResponse {
    let response = ApiResponse::<T>::error(e.to_string());
    match e {
        FetchError::NotFound(_) | FetchError::DataUnavailable(_) => {
            HttpResponse::NotFound().json(response)
        }
        FetchError::Transport(_) => HttpResponse::BadGateway().json(response),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(dashboard::config)
            .configure(stock::config)
    );
}
