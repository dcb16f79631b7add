//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 单次外部请求允许的最长超时（秒）
pub const MAX_TIMEOUT_SECS: u64 = 5;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 外部请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒），上限为 MAX_TIMEOUT_SECS
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 请求头 User-Agent，搜索接口要求浏览器标识
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 数据源地址
///
/// 默认指向 Yahoo Finance，测试时可替换为本地模拟服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 代码搜索接口
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// 公司资料/基本面接口（后接代码）
    #[serde(default = "default_quote_summary_url")]
    pub quote_summary_url: String,
    /// K线/分红接口（后接代码）
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// RSS 资讯接口
    #[serde(default = "default_news_url")]
    pub news_url: String,
    /// crumb 获取接口
    #[serde(default = "default_crumb_url")]
    pub crumb_url: String,
    /// 写入会话 cookie 的地址
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
}

/// 宏观指标条目
///
/// `symbol` 与 `value` 二选一：有代码则实时获取，否则展示固定值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroIndicatorConfig {
    /// 展示名称
    pub label: String,
    /// 行情代码（如 ^TNX、EURUSD=X）
    #[serde(default)]
    pub symbol: Option<String>,
    /// 固定值
    #[serde(default)]
    pub value: Option<f64>,
    /// 小数位数
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// 单位后缀
    #[serde(default)]
    pub unit: String,
}

/// 宏观侧栏配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroConfig {
    /// 利率与国债收益率
    #[serde(default = "default_rates")]
    pub rates: Vec<MacroIndicatorConfig>,
    /// 汇率
    #[serde(default = "default_fx")]
    pub fx: Vec<MacroIndicatorConfig>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 外部请求配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 数据源地址
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 宏观侧栏
    #[serde(default)]
    pub macro_indicators: MacroConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 配置来源
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// 从文件加载
    File(String),
    /// 文件存在但解析失败，已回退到默认值
    Fallback { path: String, error: String },
    /// 未找到配置文件
    Default,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { MAX_TIMEOUT_SECS }
fn default_connect_timeout() -> u64 { 3 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}
fn default_search_url() -> String { "https://query2.finance.yahoo.com/v1/finance/search".to_string() }
fn default_quote_summary_url() -> String {
    "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string()
}
fn default_chart_url() -> String { "https://query2.finance.yahoo.com/v8/finance/chart".to_string() }
fn default_news_url() -> String { "https://feeds.finance.yahoo.com/rss/2.0/headline".to_string() }
fn default_crumb_url() -> String { "https://query2.finance.yahoo.com/v1/test/getcrumb".to_string() }
fn default_cookie_url() -> String { "https://fc.yahoo.com".to_string() }
fn default_decimals() -> usize { 2 }
fn default_log_level() -> String { "info".to_string() }

fn live(label: &str, symbol: &str, decimals: usize, unit: &str) -> MacroIndicatorConfig {
    MacroIndicatorConfig {
        label: label.to_string(),
        symbol: Some(symbol.to_string()),
        value: None,
        decimals,
        unit: unit.to_string(),
    }
}

fn fixed(label: &str, value: f64, decimals: usize, unit: &str) -> MacroIndicatorConfig {
    MacroIndicatorConfig {
        label: label.to_string(),
        symbol: None,
        value: Some(value),
        decimals,
        unit: unit.to_string(),
    }
}

fn default_rates() -> Vec<MacroIndicatorConfig> {
    vec![
        live("US 10 Years", "^TNX", 3, "%"),
        fixed("OAT France (10 ans)", 2.85, 2, "%"),
        fixed("Bund Allemagne (10 ans)", 2.35, 2, "%"),
    ]
}

fn default_fx() -> Vec<MacroIndicatorConfig> {
    vec![
        live("EUR / USD", "EURUSD=X", 4, ""),
        live("GBP / USD", "GBPUSD=X", 4, ""),
        live("USD / JPY", "JPY=X", 2, ""),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            quote_summary_url: default_quote_summary_url(),
            chart_url: default_chart_url(),
            news_url: default_news_url(),
            crumb_url: default_crumb_url(),
            cookie_url: default_cookie_url(),
        }
    }
}

impl ProviderConfig {
    /// 所有接口指向同一基础地址（用于本地模拟服务）
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search_url: format!("{}/v1/finance/search", base),
            quote_summary_url: format!("{}/v10/finance/quoteSummary", base),
            chart_url: format!("{}/v8/finance/chart", base),
            news_url: format!("{}/rss/2.0/headline", base),
            crumb_url: format!("{}/v1/test/getcrumb", base),
            cookie_url: format!("{}/", base),
        }
    }
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            rates: default_rates(),
            fx: default_fx(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ApiConfig {
    /// 请求超时，不超过 MAX_TIMEOUT_SECS
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, MAX_TIMEOUT_SECS))
    }

    /// 连接超时，不超过请求超时
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1)).min(self.timeout())
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 日志系统依赖配置中的级别，因此这里不打印日志，而是返回配置来源
    pub fn load() -> (Self, ConfigSource) {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                return match Self::from_file(path) {
                    Ok(config) => (config, ConfigSource::File(path.to_string())),
                    Err(e) => (
                        Self::default(),
                        ConfigSource::Fallback {
                            path: path.to_string(),
                            error: e.to_string(),
                        },
                    ),
                };
            }
        }

        (Self::default(), ConfigSource::Default)
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
