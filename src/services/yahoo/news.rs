//! 个股资讯
//!
//! 解析 RSS 2.0 文档，提取标题、链接、摘要和发布时间

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::common::ensure_success;
use super::YahooClient;
use crate::error::FetchError;
use crate::models::NewsItem;

/// 每个代码最多返回的资讯条数
pub const MAX_NEWS_ITEMS: usize = 5;
/// 缺少发布时间时的占位符
pub const DATE_UNKNOWN: &str = "date unknown";
/// 发布时间中需要去掉的时区后缀
const UTC_SUFFIX: &str = " +0000";

lazy_static! {
    static ref ITEM_RE: Result<Regex, regex::Error> = Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>");
    static ref TITLE_RE: Result<Regex, regex::Error> = Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>");
    static ref LINK_RE: Result<Regex, regex::Error> = Regex::new(r"(?s)<link\b[^>]*>(.*?)</link>");
    static ref DESCRIPTION_RE: Result<Regex, regex::Error> =
        Regex::new(r"(?s)<description\b[^>]*>(.*?)</description>");
    static ref PUB_DATE_RE: Result<Regex, regex::Error> = Regex::new(r"(?s)<pubDate\b[^>]*>(.*?)</pubDate>");
    /// 数字字符引用：&#8217; 或 &#x27;
    static ref CHAR_REF_RE: Result<Regex, regex::Error> = Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));");
}

impl YahooClient {
    /// 获取个股资讯，保持 RSS 原始顺序，最多 MAX_NEWS_ITEMS 条
    pub async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsItem>, FetchError> {
        log::debug!("📡 请求资讯 URL: {} s={}", self.endpoints.news_url, ticker);

        let response = self
            .client
            .get(&self.endpoints.news_url)
            .query(&[("s", ticker), ("region", "US"), ("lang", "en-US")])
            .send()
            .await?;

        let response = ensure_success(response, "资讯")?;
        let body = response.text().await?;
        parse_rss(&body)
    }

    /// 获取个股资讯，任何失败都返回空列表
    pub async fn news(&self, ticker: &str) -> Vec<NewsItem> {
        self.fetch_news(ticker).await.unwrap_or_else(|e| {
            log::warn!("[{}] 获取资讯失败: {}", ticker, e);
            Vec::new()
        })
    }
}

/// 解析 RSS 文档
///
/// 既没有 `<rss` 也没有 `<channel` 的文档视为格式错误
pub fn parse_rss(xml: &str) -> Result<Vec<NewsItem>, FetchError> {
    if !xml.contains("<rss") && !xml.contains("<channel") {
        return Err(FetchError::Transport("资讯格式错误: 不是 RSS 文档".to_string()));
    }

    let item_re = ITEM_RE
        .as_ref()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let items = item_re
        .captures_iter(xml)
        .take(MAX_NEWS_ITEMS)
        .map(|cap| {
            let body = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let description = element_text(body, &DESCRIPTION_RE);
            NewsItem {
                title: element_text(body, &TITLE_RE),
                link: element_text(body, &LINK_RE),
                summary: extract_summary(description.as_deref()),
                published_at: clean_pub_date(element_text(body, &PUB_DATE_RE).as_deref()),
            }
        })
        .collect();

    Ok(items)
}

/// 摘要：描述中第一个 `<` 之前的文本
pub fn extract_summary(description: Option<&str>) -> String {
    match description {
        Some(text) => match text.find('<') {
            Some(pos) => text[..pos].to_string(),
            None => text.to_string(),
        },
        None => String::new(),
    }
}

/// 发布时间：去掉结尾的 " +0000"，缺失时返回 DATE_UNKNOWN
pub fn clean_pub_date(raw: Option<&str>) -> String {
    match raw {
        Some(date) => date.strip_suffix(UTC_SUFFIX).unwrap_or(date).to_string(),
        None => DATE_UNKNOWN.to_string(),
    }
}

/// 读取子元素文本：去掉 CDATA 包裹并解码 XML 实体，空文本视为缺失
fn element_text(body: &str, element: &Result<Regex, regex::Error>) -> Option<String> {
    let re = element.as_ref().ok()?;
    let raw = re.captures(body)?.get(1)?.as_str().trim();

    let unwrapped = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .map(str::to_string)
        .unwrap_or_else(|| decode_entities(raw));

    let text = unwrapped.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// 解码 XML 实体
///
/// 数字字符引用先于 `&amp;` 解码，无效码点原样保留
fn decode_entities(text: &str) -> String {
    let text = match CHAR_REF_RE.as_ref() {
        Ok(re) => re.replace_all(text, decode_char_ref).into_owned(),
        Err(_) => text.to_string(),
    };

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn decode_char_ref(caps: &Captures) -> String {
    let code = match (caps.get(1), caps.get(2)) {
        (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
        (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
        _ => None,
    };

    match code.and_then(char::from_u32) {
        Some(c) => c.to_string(),
        None => caps[0].to_string(),
    }
}
