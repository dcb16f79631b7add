//! Yahoo Finance 数据服务
//!
//! 对接 Yahoo Finance 的搜索、资料、K线和 RSS 资讯接口
//!
//! ## 数据来源
//! - v1/finance/search：代码搜索
//! - v10/finance/quoteSummary：公司资料、基本面、利润表
//! - v8/finance/chart：日K线、分红、最新价
//! - rss/2.0/headline：个股资讯
//!
//! 每次调用互相独立、无状态，失败在本模块内归类为 [`FetchError`]

mod chart;
mod common;
mod news;
mod quote;
mod search;

use reqwest::Client;

use crate::config::{ApiConfig, AppConfig, ProviderConfig};
use crate::error::FetchError;

/// Yahoo Finance 客户端
///
/// 封装 HTTP 客户端和数据源地址，所有获取方法见各子模块
pub struct YahooClient {
    /// HTTP 客户端
    client: Client,
    /// 数据源地址
    endpoints: ProviderConfig,
}

impl YahooClient {
    /// 创建客户端
    pub fn new(api: &ApiConfig, endpoints: ProviderConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(api.timeout())
            .connect_timeout(api.connect_timeout())
            .user_agent(api.user_agent.as_str())
            .cookie_store(true)
            .gzip(true)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// 根据应用配置创建客户端
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(&config.api, config.provider.clone())
    }
}
