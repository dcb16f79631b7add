//! 错误类型
//!
//! 所有外部数据源调用的失败在组件边界被归类为三种结果：
//! - NotFound: 代码解析没有候选结果
//! - DataUnavailable: 某项指标/序列/资讯为空或缺失
//! - Transport: 网络、超时或响应格式错误

use thiserror::Error;

/// 行情数据获取错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// 未找到匹配的代码
    #[error("未找到匹配的代码: {0}")]
    NotFound(String),
    /// 数据不可用
    #[error("数据不可用: {0}")]
    DataUnavailable(String),
    /// 网络请求或响应解析失败
    #[error("请求失败: {0}")]
    Transport(String),
}

impl FetchError {
    /// 稳定的错误类别标识，用于 JSON 输出
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "not_found",
            FetchError::DataUnavailable(_) => "data_unavailable",
            FetchError::Transport(_) => "transport_failure",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Transport(format!("请求超时: {}", e))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Transport(format!("响应格式错误: {}", e))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::Transport(format!("无效的请求地址: {}", e))
    }
}
