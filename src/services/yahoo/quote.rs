//! 公司资料与基本面
//!
//! quoteSummary 接口按模块返回数据，这里一次性映射为 [`Quote`] 和 [`IncomeStatementRow`]

use chrono::Datelike;
use serde_json::Value;

use super::common::{
    ensure_success, epoch_to_date, error_description, first_result, raw_f64, raw_i64, text,
    ticker_url,
};
use super::YahooClient;
use crate::error::FetchError;
use crate::models::{IncomeStatementRow, Quote};

/// 行情快照所需模块
const QUOTE_MODULES: &str =
    "price,assetProfile,summaryDetail,financialData,defaultKeyStatistics";
/// 利润表模块
const INCOME_MODULES: &str = "incomeStatementHistory";

impl YahooClient {
    /// 获取公司行情与基本面
    pub async fn fetch_quote(&self, ticker: &str) -> Result<Quote, FetchError> {
        let result = self.quote_summary(ticker, QUOTE_MODULES).await?;
        Ok(parse_quote(ticker, &result))
    }

    /// 获取年度利润表，按年份升序
    pub async fn fetch_income_statement(
        &self,
        ticker: &str,
    ) -> Result<Vec<IncomeStatementRow>, FetchError> {
        let result = self.quote_summary(ticker, INCOME_MODULES).await?;
        Ok(parse_income_statement(&result))
    }

    /// 请求 quoteSummary 并返回 result[0]
    async fn quote_summary(&self, ticker: &str, modules: &str) -> Result<Value, FetchError> {
        let url = ticker_url(&self.endpoints.quote_summary_url, ticker)?;
        let crumb = self.crumb().await;

        log::debug!("📡 请求 quoteSummary URL: {} modules={}", url, modules);

        let mut request = self.client.get(url).query(&[("modules", modules)]);
        if let Some(crumb) = crumb.as_deref() {
            request = request.query(&[("crumb", crumb)]);
        }

        let response = request.send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::DataUnavailable(format!("{} 无公司资料", ticker)));
        }

        let response = ensure_success(response, "公司资料")?;
        let json: Value = serde_json::from_slice(&response.bytes().await?)?;

        match first_result(&json, "quoteSummary") {
            Some(result) => Ok(result.clone()),
            None => {
                let reason = error_description(&json, "quoteSummary")
                    .unwrap_or_else(|| "返回结果为空".to_string());
                Err(FetchError::DataUnavailable(format!("{}: {}", ticker, reason)))
            }
        }
    }

    /// 获取会话 crumb，失败时返回 None，按无 crumb 请求
    async fn crumb(&self) -> Option<String> {
        // 先访问 cookie 地址写入会话 cookie，结果无关紧要
        if let Err(e) = self.client.get(&self.endpoints.cookie_url).send().await {
            log::debug!("写入会话 cookie 失败: {}", e);
        }

        let response = self.client.get(&self.endpoints.crumb_url).send().await.ok()?;
        if !response.status().is_success() {
            log::debug!("获取 crumb 失败: {}", response.status());
            return None;
        }

        let crumb = response.text().await.ok()?;
        let crumb = crumb.trim();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return None;
        }
        Some(crumb.to_string())
    }
}

/// 映射行情快照
fn parse_quote(ticker: &str, result: &Value) -> Quote {
    let empty = Value::Null;
    let price = result.get("price").unwrap_or(&empty);
    let profile = result.get("assetProfile").unwrap_or(&empty);
    let detail = result.get("summaryDetail").unwrap_or(&empty);
    let financial = result.get("financialData").unwrap_or(&empty);
    let stats = result.get("defaultKeyStatistics").unwrap_or(&empty);

    Quote {
        ticker: ticker.to_string(),
        current_price: raw_f64(financial, "currentPrice")
            .or_else(|| raw_f64(price, "regularMarketPrice")),
        currency: text(price, "currency").or_else(|| text(detail, "currency")),
        market_cap: raw_f64(price, "marketCap").or_else(|| raw_f64(detail, "marketCap")),
        sector: text(profile, "sector"),
        city: text(profile, "city"),
        country: text(profile, "country"),
        short_name: text(price, "shortName"),
        long_business_summary: text(profile, "longBusinessSummary"),
        trailing_pe: raw_f64(detail, "trailingPE"),
        enterprise_to_ebitda: raw_f64(stats, "enterpriseToEbitda"),
        profit_margins: raw_f64(financial, "profitMargins")
            .or_else(|| raw_f64(stats, "profitMargins")),
        return_on_equity: raw_f64(financial, "returnOnEquity"),
        return_on_assets: raw_f64(financial, "returnOnAssets"),
        beta: raw_f64(detail, "beta").or_else(|| raw_f64(stats, "beta")),
        debt_to_equity: raw_f64(financial, "debtToEquity"),
        current_ratio: raw_f64(financial, "currentRatio"),
        dividend_rate: raw_f64(detail, "dividendRate"),
        price_to_book: raw_f64(stats, "priceToBook"),
        ex_dividend_date: raw_i64(detail, "exDividendDate").and_then(epoch_to_date),
    }
}

/// 映射利润表，缺少财年截止日的行被丢弃
fn parse_income_statement(result: &Value) -> Vec<IncomeStatementRow> {
    let statements = result
        .get("incomeStatementHistory")
        .and_then(|m| m.get("incomeStatementHistory"))
        .and_then(Value::as_array);

    let mut rows: Vec<IncomeStatementRow> = statements
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let end_date = raw_i64(item, "endDate").and_then(epoch_to_date)?;
            Some(IncomeStatementRow {
                year: end_date.year(),
                total_revenue: raw_f64(item, "totalRevenue"),
                net_income: raw_f64(item, "netIncome"),
            })
        })
        .collect();

    rows.sort_by_key(|row| row.year);
    rows
}
