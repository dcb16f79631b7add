//! K线、分红和最新价
//!
//! 均来自 v8/finance/chart 接口，区别在于区间、周期和事件参数

use serde_json::Value;

use super::common::{
    ensure_success, epoch_to_local_date, exchange_timezone, first_result, raw_f64, ticker_url,
};
use super::YahooClient;
use crate::error::FetchError;
use crate::models::{DividendRecord, PricePoint, PriceSeries};

/// 保留的分红记录条数
pub const MAX_DIVIDENDS: usize = 10;

/// 历史走势固定为最近一年日K线
const HISTORY_RANGE: &str = "1y";
const HISTORY_INTERVAL: &str = "1d";
/// 分红回看区间
const DIVIDEND_RANGE: &str = "10y";
const DIVIDEND_INTERVAL: &str = "1mo";

impl YahooClient {
    /// 获取最近一年日收盘价
    ///
    /// 数据源没有该代码数据时返回空序列而非错误
    pub async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, FetchError> {
        let params = [("range", HISTORY_RANGE), ("interval", HISTORY_INTERVAL)];
        let points = match self.chart(ticker, &params).await? {
            Some(result) => parse_close_series(&result),
            None => {
                log::warn!("[{}] 无历史数据，返回空序列", ticker);
                Vec::new()
            }
        };
        let series = PriceSeries::new(ticker, points);
        log::debug!("[{}] 获取 {} 条日收盘价", ticker, series.len());
        Ok(series)
    }

    /// 获取分红记录，最新在前，最多 MAX_DIVIDENDS 条
    pub async fn fetch_dividends(&self, ticker: &str) -> Result<Vec<DividendRecord>, FetchError> {
        let params = [
            ("range", DIVIDEND_RANGE),
            ("interval", DIVIDEND_INTERVAL),
            ("events", "div"),
        ];
        let records = match self.chart(ticker, &params).await? {
            Some(result) => parse_dividends(&result),
            None => Vec::new(),
        };
        Ok(records)
    }

    /// 获取最新价（宏观侧栏用）
    pub async fn latest_price(&self, ticker: &str) -> Result<f64, FetchError> {
        let params = [("range", "1d"), ("interval", "1d")];
        let result = self
            .chart(ticker, &params)
            .await?
            .ok_or_else(|| FetchError::DataUnavailable(format!("{} 无行情数据", ticker)))?;

        parse_latest_price(&result)
            .ok_or_else(|| FetchError::DataUnavailable(format!("{} 无最新价", ticker)))
    }

    /// 请求 chart 接口，404 或空结果返回 None
    async fn chart(&self, ticker: &str, params: &[(&str, &str)]) -> Result<Option<Value>, FetchError> {
        let url = ticker_url(&self.endpoints.chart_url, ticker)?;
        log::debug!("📡 请求K线数据 URL: {} {:?}", url, params);

        let response = self.client.get(url).query(params).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = ensure_success(response, "K线数据")?;
        let json: Value = serde_json::from_slice(&response.bytes().await?)?;
        Ok(first_result(&json, "chart").cloned())
    }
}

/// 解析收盘价序列，跳过空值，按日期升序
///
/// 日期按交易所时区换算
fn parse_close_series(result: &Value) -> Vec<PricePoint> {
    let tz = exchange_timezone(result);
    let timestamps = match result.get("timestamp").and_then(Value::as_array) {
        Some(ts) => ts,
        None => return Vec::new(),
    };
    let closes = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(Value::as_array)
        .and_then(|q| q.first())
        .and_then(|q| q.get("close"))
        .and_then(Value::as_array);
    let closes = match closes {
        Some(c) => c,
        None => return Vec::new(),
    };

    let mut points: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let date = ts.as_i64().and_then(|secs| epoch_to_local_date(secs, tz))?;
            let close = close.as_f64().filter(|c| c.is_finite())?;
            Some(PricePoint { date, close })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

/// 解析 events.dividends，最新在前，截取 MAX_DIVIDENDS 条
fn parse_dividends(result: &Value) -> Vec<DividendRecord> {
    let tz = exchange_timezone(result);
    let events = match result
        .get("events")
        .and_then(|e| e.get("dividends"))
        .and_then(Value::as_object)
    {
        Some(events) => events,
        None => return Vec::new(),
    };

    let mut records: Vec<DividendRecord> = events
        .iter()
        .filter_map(|(key, event)| {
            let secs = event
                .get("date")
                .and_then(Value::as_i64)
                .or_else(|| key.parse::<i64>().ok())?;
            Some(DividendRecord {
                date: epoch_to_local_date(secs, tz)?,
                amount: raw_f64(event, "amount")?,
            })
        })
        .collect();

    records.sort_by(|a, b| b.date.cmp(&a.date));
    records.truncate(MAX_DIVIDENDS);
    records
}

/// meta.regularMarketPrice，缺失时取最后一个非空收盘价
fn parse_latest_price(result: &Value) -> Option<f64> {
    result
        .get("meta")
        .and_then(|meta| raw_f64(meta, "regularMarketPrice"))
        .or_else(|| parse_close_series(result).last().map(|p| p.close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, ProviderConfig};
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    const DAY: i64 = 86_400;
    /// 2024-01-02 00:00:00 UTC
    const START: i64 = 1_704_153_600;

    fn client_for(server: &MockServer) -> YahooClient {
        YahooClient::new(&ApiConfig::default(), ProviderConfig::with_base(&server.base_url())).unwrap()
    }

    /// 测试收盘价解析（跳过空值）
    #[test]
    fn test_parse_close_series() {
        let result = json!({
            "meta": {"currency": "EUR"},
            "timestamp": [START, START + DAY, START + 2 * DAY],
            "indicators": {"quote": [{"close": [60.1, null, 61.4]}]}
        });
        let points = parse_close_series(&result);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].close, 61.4);
        assert!(parse_close_series(&json!({"meta": {}})).is_empty());
    }

    /// 测试按交易所时区取日期
    #[test]
    fn test_parse_close_series_exchange_timezone() {
        // 澳交所日K线时间戳落在 UTC 前一天
        let result = json!({
            "meta": {"exchangeTimezoneName": "Australia/Sydney"},
            "timestamp": [START - 3_600, START + DAY - 3_600],
            "indicators": {"quote": [{"close": [120.5, 121.0]}]}
        });
        let points = parse_close_series(&result);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    /// 测试分红排序与截断
    #[test]
    fn test_parse_dividends() {
        let mut dividends = serde_json::Map::new();
        for i in 0..12i64 {
            let ts = START + i * 30 * DAY;
            dividends.insert(ts.to_string(), json!({"amount": 1.0 + i as f64, "date": ts}));
        }
        let result = json!({"events": {"dividends": dividends}});

        let records = parse_dividends(&result);
        assert_eq!(records.len(), MAX_DIVIDENDS);
        assert_eq!(records[0].amount, 12.0);
        assert!(records.windows(2).all(|w| w[0].date > w[1].date));
        assert!(parse_dividends(&json!({})).is_empty());
    }

    /// 测试最新价回退
    #[test]
    fn test_parse_latest_price() {
        let with_meta = json!({"meta": {"regularMarketPrice": 4.215}});
        assert_eq!(parse_latest_price(&with_meta), Some(4.215));

        let without_meta = json!({
            "meta": {},
            "timestamp": [START],
            "indicators": {"quote": [{"close": [1.0874]}]}
        });
        assert_eq!(parse_latest_price(&without_meta), Some(1.0874));
        assert_eq!(parse_latest_price(&json!({})), None);
    }

    /// 测试未知代码返回空序列
    #[tokio::test]
    async fn test_fetch_history_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v8/finance/chart/DELISTED");
                then.status(404).json_body(json!({
                    "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v8/finance/chart/NULLRES");
                then.status(200).json_body(json!({"chart": {"result": null, "error": null}}));
            })
            .await;

        let client = client_for(&server);
        assert!(client.fetch_history("DELISTED").await.unwrap().is_empty());
        assert!(client.fetch_history("NULLRES").await.unwrap().is_empty());
        assert!(client.fetch_dividends("DELISTED").await.unwrap().is_empty());
        assert_eq!(client.latest_price("DELISTED").await.unwrap_err().kind(), "data_unavailable");
    }

    /// 测试一年日K线请求参数
    #[tokio::test]
    async fn test_fetch_history_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v8/finance/chart/BNP.PA")
                    .query_param("range", "1y")
                    .query_param("interval", "1d");
                then.status(200).json_body(json!({
                    "chart": {"result": [{
                        "timestamp": [START, START + DAY],
                        "indicators": {"quote": [{"close": [60.0, 63.0]}]}
                    }], "error": null}
                }));
            })
            .await;

        let series = client_for(&server).fetch_history("BNP.PA").await.unwrap();
        assert_eq!(series.ticker, "BNP.PA");
        assert_eq!(series.closes(), vec![60.0, 63.0]);
        mock.assert_async().await;
    }

    /// 测试服务端错误归类
    #[tokio::test]
    async fn test_fetch_history_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v8/finance/chart/AAPL");
                then.status(500);
            })
            .await;

        let err = client_for(&server).fetch_history("AAPL").await.unwrap_err();
        assert_eq!(err.kind(), "transport_failure");
    }
}
