//! 公共常量和辅助函数

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use reqwest::Response;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// 在基础地址后追加代码路径段（自动转义 /、?、# 等字符）
pub fn ticker_url(base: &str, ticker: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Transport(format!("无效的请求地址: {}", base)))?
        .pop_if_empty()
        .push(ticker);
    Ok(url)
}

/// 非 2xx 响应归类为传输失败
pub fn ensure_success(response: Response, what: &str) -> Result<Response, FetchError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(FetchError::Transport(format!("获取{}失败: {}", what, response.status())))
    }
}

/// 读取数值字段
///
/// 兼容裸数值和 `{"raw": 1.2, "fmt": "1.20"}` 两种形式，空对象或非有限值视为缺失
pub fn raw_f64(module: &Value, key: &str) -> Option<f64> {
    let value = module.get(key)?;
    let n = match value {
        Value::Object(_) => value.get("raw")?.as_f64()?,
        _ => value.as_f64()?,
    };
    n.is_finite().then_some(n)
}

/// 读取整数字段（时间戳等）
pub fn raw_i64(module: &Value, key: &str) -> Option<i64> {
    let value = module.get(key)?;
    match value {
        Value::Object(_) => value.get("raw")?.as_i64(),
        _ => value.as_i64(),
    }
}

/// 读取文本字段，空白视为缺失
pub fn text(module: &Value, key: &str) -> Option<String> {
    module
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Unix 秒级时间戳转日期（UTC）
pub fn epoch_to_date(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// 交易所时区 `meta.exchangeTimezoneName`，缺失或无法识别时为 UTC
pub fn exchange_timezone(result: &Value) -> Tz {
    result
        .get("meta")
        .and_then(|meta| meta.get("exchangeTimezoneName"))
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Unix 秒级时间戳按交易所时区转日期
pub fn epoch_to_local_date(secs: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// 取 `{root}.result[0]`，result 为空或为 null 时返回 None
pub fn first_result<'a>(json: &'a Value, root: &str) -> Option<&'a Value> {
    json.get(root)?.get("result")?.as_array()?.first()
}

/// 取 `{root}.error.description`
pub fn error_description(json: &Value, root: &str) -> Option<String> {
    let error = json.get(root)?.get("error")?;
    error
        .get("description")
        .and_then(Value::as_str)
        .or_else(|| error.get("code").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 测试代码路径转义
    #[test]
    fn test_ticker_url() {
        let url = ticker_url("https://query2.finance.yahoo.com/v8/finance/chart", "^TNX").unwrap();
        assert!(url.path().starts_with("/v8/finance/chart/"));
        assert!(url.path().ends_with("TNX"));
        assert_eq!(url.path_segments().map(|s| s.count()), Some(4));

        let url = ticker_url("https://query2.finance.yahoo.com/v8/finance/chart", "A/B").unwrap();
        assert!(url.path().ends_with("/chart/A%2FB"));

        let url = ticker_url("http://127.0.0.1:1234/v8/finance/chart/", "EURUSD=X").unwrap();
        assert!(url.as_str().ends_with("/v8/finance/chart/EURUSD=X"));
        assert!(ticker_url("not a url", "AAPL").is_err());
    }

    /// 测试数值字段读取
    #[test]
    fn test_raw_f64() {
        let module = json!({
            "trailingPE": {"raw": 7.52, "fmt": "7.52"},
            "beta": 1.31,
            "priceToBook": {},
            "marketCap": null,
            "sector": "Financial Services"
        });
        assert_eq!(raw_f64(&module, "trailingPE"), Some(7.52));
        assert_eq!(raw_f64(&module, "beta"), Some(1.31));
        assert_eq!(raw_f64(&module, "priceToBook"), None);
        assert_eq!(raw_f64(&module, "marketCap"), None);
        assert_eq!(raw_f64(&module, "sector"), None);
        assert_eq!(raw_f64(&module, "missing"), None);
    }

    /// 测试时间戳与文本
    #[test]
    fn test_epoch_and_text() {
        let module = json!({"exDividendDate": {"raw": 1716163200}, "city": "  ", "country": "France"});
        let date = raw_i64(&module, "exDividendDate").and_then(epoch_to_date);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 20));
        assert_eq!(text(&module, "city"), None);
        assert_eq!(text(&module, "country").as_deref(), Some("France"));
    }

    /// 测试交易所时区换算
    #[test]
    fn test_exchange_timezone() {
        // 2024-01-01 23:00 UTC，悉尼已是 1 月 2 日上午
        let secs = 1_704_150_000;
        let asx = json!({"meta": {"exchangeTimezoneName": "Australia/Sydney"}});
        let tz = exchange_timezone(&asx);
        assert_eq!(epoch_to_local_date(secs, tz), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(epoch_to_date(secs), NaiveDate::from_ymd_opt(2024, 1, 1));

        assert_eq!(exchange_timezone(&json!({"meta": {}})), Tz::UTC);
        assert_eq!(exchange_timezone(&json!({"meta": {"exchangeTimezoneName": "Mars/Olympus"}})), Tz::UTC);
    }

    /// 测试 result 与 error 提取
    #[test]
    fn test_first_result_and_error() {
        let ok = json!({"chart": {"result": [{"meta": {}}], "error": null}});
        assert!(first_result(&ok, "chart").is_some());

        let missing = json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}});
        assert!(first_result(&missing, "chart").is_none());
        assert_eq!(
            error_description(&missing, "chart").as_deref(),
            Some("No data found, symbol may be delisted")
        );
    }
}
