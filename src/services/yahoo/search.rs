//! 代码解析
//!
//! 将公司名称或代码文本解析为行情代码，直接采用数据源排序的第一个候选

use serde_json::Value;

use super::common::ensure_success;
use super::YahooClient;
use crate::error::FetchError;

impl YahooClient {
    /// 搜索代码
    ///
    /// 候选列表为空返回 NotFound，网络或格式错误返回 Transport
    pub async fn search_symbol(&self, query: &str) -> Result<String, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FetchError::NotFound("查询为空".to_string()));
        }

        log::debug!("📡 请求代码搜索 URL: {} q={}", self.endpoints.search_url, query);

        let response = self
            .client
            .get(&self.endpoints.search_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let response = ensure_success(response, "代码搜索")?;
        let json: Value = serde_json::from_slice(&response.bytes().await?)?;

        parse_search_response(&json)
            .ok_or_else(|| FetchError::NotFound(format!("没有与 {} 匹配的代码", query)))
    }

    /// 解析代码，任何失败都返回 None
    pub async fn resolve(&self, query: &str) -> Option<String> {
        match self.search_symbol(query).await {
            Ok(symbol) => {
                log::info!("代码解析: {} -> {}", query, symbol);
                Some(symbol)
            }
            Err(e) => {
                log::warn!("代码解析失败 {}: {}", query, e);
                None
            }
        }
    }
}

/// 取 `quotes[0].symbol`
fn parse_search_response(json: &Value) -> Option<String> {
    json.get("quotes")?
        .as_array()?
        .first()?
        .get("symbol")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
