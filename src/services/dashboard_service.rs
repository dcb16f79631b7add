//! 看板数据服务
//!
//! 代码解析 -> 并发获取各类数据 -> 格式化为展示数据。
//! 单个分区失败只影响该分区，不中断整个看板

use futures::future::join_all;

use crate::config::{MacroConfig, MacroIndicatorConfig};
use crate::error::FetchError;
use crate::models::{
    CompanyOverview, Dashboard, DividendRecord, DividendRow, DividendsView, FundamentalsView,
    IncomeRow, IncomeStatementRow, MacroIndicator, MacroSnapshot, NewsItem, PerformanceView,
    PriceSeries, Quote, Section,
};
use crate::services::format::{
    format_date, format_number, format_ratio_percent, format_scaled, format_signed_percent,
    shorten_description, text_or_na, NOT_AVAILABLE,
};
use crate::services::trend::TrendSet;
use crate::services::yahoo::YahooClient;

/// 构建完整看板
///
/// 仅在代码解析失败时返回错误（NotFound）
pub async fn build_dashboard(client: &YahooClient, query: &str) -> Result<Dashboard, FetchError> {
    let ticker = client
        .resolve(query)
        .await
        .ok_or_else(|| FetchError::NotFound(format!("无法找到与 {} 对应的代码", query.trim())))?;

    let (quote, history, dividends, income, news) = tokio::join!(
        client.fetch_quote(&ticker),
        client.fetch_history(&ticker),
        client.fetch_dividends(&ticker),
        client.fetch_income_statement(&ticker),
        client.fetch_news(&ticker),
    );

    let dashboard = assemble_dashboard(query, &ticker, quote, history, dividends, income, news);
    let available = [
        dashboard.overview.is_available(),
        dashboard.fundamentals.is_available(),
        dashboard.performance.is_available(),
        dashboard.dividends.is_available(),
        dashboard.income_statement.is_available(),
        dashboard.news.is_available(),
    ]
    .iter()
    .filter(|ok| **ok)
    .count();
    log::info!("[{}] 看板组装完成，可用分区 {}/6", ticker, available);

    Ok(dashboard)
}

/// 将各数据源结果组装为看板
pub fn assemble_dashboard(
    query: &str,
    ticker: &str,
    quote: Result<Quote, FetchError>,
    history: Result<PriceSeries, FetchError>,
    dividends: Result<Vec<DividendRecord>, FetchError>,
    income: Result<Vec<IncomeStatementRow>, FetchError>,
    news: Result<Vec<NewsItem>, FetchError>,
) -> Dashboard {
    for (section, result) in [
        ("quote", quote.as_ref().err()),
        ("history", history.as_ref().err()),
        ("dividends", dividends.as_ref().err()),
        ("income", income.as_ref().err()),
        ("news", news.as_ref().err()),
    ] {
        if let Some(e) = result {
            log::warn!("[{}] {} 分区不可用: {}", ticker, section, e);
        }
    }

    let quote_ref = quote.as_ref().map_err(FetchError::clone);

    Dashboard {
        query: query.trim().to_string(),
        ticker: ticker.to_string(),
        overview: to_section(quote_ref.clone().map(|q| overview_view(q, ticker))),
        fundamentals: to_section(quote_ref.map(fundamentals_view)),
        performance: to_section(history.and_then(|s| performance_view(&s))),
        dividends: to_section(dividends.and_then(|d| dividends_view(quote.as_ref().ok(), &d))),
        income_statement: to_section(income.and_then(|rows| income_view(&rows))),
        news: to_section(news.and_then(news_view)),
    }
}

fn to_section<T>(result: Result<T, FetchError>) -> Section<T> {
    match result {
        Ok(data) => Section::available(data),
        Err(e) => Section::unavailable(&e),
    }
}

/// 公司概况
pub fn overview_view(quote: &Quote, ticker: &str) -> CompanyOverview {
    let currency = quote.currency.as_deref().unwrap_or("");
    let market_cap = format_scaled(quote.market_cap);
    let market_cap = if market_cap == NOT_AVAILABLE {
        market_cap
    } else {
        format!("{} {}", market_cap, currency).trim().to_string()
    };

    CompanyOverview {
        name: quote.short_name.clone().unwrap_or_else(|| ticker.to_string()),
        headquarters: format!(
            "{}, {}",
            text_or_na(quote.city.as_deref()),
            text_or_na(quote.country.as_deref())
        ),
        description: shorten_description(quote.long_business_summary.as_deref()),
        price: format_number(quote.current_price, 2, currency),
        sector: text_or_na(quote.sector.as_deref()),
        market_cap,
        pe_ratio: format_number(quote.trailing_pe, 2, ""),
    }
}

/// 基本面指标
pub fn fundamentals_view(quote: &Quote) -> FundamentalsView {
    FundamentalsView {
        enterprise_to_ebitda: format_number(quote.enterprise_to_ebitda, 2, ""),
        profit_margins: format_ratio_percent(quote.profit_margins),
        return_on_equity: format_ratio_percent(quote.return_on_equity),
        return_on_assets: format_ratio_percent(quote.return_on_assets),
        beta: format_number(quote.beta, 2, ""),
        debt_to_equity: format_number(quote.debt_to_equity, 2, ""),
        current_ratio: format_number(quote.current_ratio, 2, ""),
        price_to_book: format_number(quote.price_to_book, 2, ""),
    }
}

/// 区间表现，空序列视为数据不可用
pub fn performance_view(series: &PriceSeries) -> Result<PerformanceView, FetchError> {
    if series.is_empty() {
        return Err(FetchError::DataUnavailable(format!(
            "{} 无历史数据",
            series.ticker
        )));
    }

    let trends = TrendSet::from_series(series);
    Ok(PerformanceView {
        one_month: format_signed_percent(trends.one_month),
        three_months: format_signed_percent(trends.three_months),
        six_months: format_signed_percent(trends.six_months),
        one_year: format_signed_percent(trends.one_year),
        series: series.points.clone(),
    })
}

/// 分红信息，既无分红记录也无年度分红时视为数据不可用
pub fn dividends_view(
    quote: Option<&Quote>,
    records: &[DividendRecord],
) -> Result<DividendsView, FetchError> {
    let dividend_rate = quote.and_then(|q| q.dividend_rate);
    if records.is_empty() && dividend_rate.is_none() {
        return Err(FetchError::DataUnavailable("无分红记录".to_string()));
    }

    let currency = quote.and_then(|q| q.currency.as_deref()).unwrap_or("");
    Ok(DividendsView {
        dividend_rate: format_number(dividend_rate, 2, currency),
        ex_dividend_date: format_date(quote.and_then(|q| q.ex_dividend_date)),
        history: records
            .iter()
            .map(|r| DividendRow {
                date: format_date(Some(r.date)),
                amount: format_number(Some(r.amount), 2, currency),
            })
            .collect(),
    })
}

/// 年度利润表
pub fn income_view(rows: &[IncomeStatementRow]) -> Result<Vec<IncomeRow>, FetchError> {
    if rows.is_empty() {
        return Err(FetchError::DataUnavailable("无利润表数据".to_string()));
    }

    Ok(rows
        .iter()
        .map(|row| IncomeRow {
            year: row.year,
            total_revenue: format_scaled(row.total_revenue),
            net_income: format_scaled(row.net_income),
        })
        .collect())
}

fn news_view(items: Vec<NewsItem>) -> Result<Vec<NewsItem>, FetchError> {
    if items.is_empty() {
        Err(FetchError::DataUnavailable("暂无相关资讯".to_string()))
    } else {
        Ok(items)
    }
}

// ==================== 宏观侧栏 ====================

/// 构建宏观侧栏，实时指标获取失败时不展示该项
pub async fn build_macro_snapshot(client: &YahooClient, config: &MacroConfig) -> MacroSnapshot {
    let (rates, fx) = tokio::join!(
        resolve_indicators(client, &config.rates),
        resolve_indicators(client, &config.fx),
    );
    MacroSnapshot { rates, fx }
}

async fn resolve_indicators(
    client: &YahooClient,
    indicators: &[MacroIndicatorConfig],
) -> Vec<MacroIndicator> {
    let values = join_all(indicators.iter().map(|ind| indicator_value(client, ind))).await;

    indicators
        .iter()
        .zip(values)
        .filter_map(|(ind, value)| {
            value.map(|v| MacroIndicator {
                label: ind.label.clone(),
                symbol: ind.symbol.clone(),
                value: format_number(Some(v), ind.decimals, &ind.unit),
            })
        })
        .collect()
}

async fn indicator_value(client: &YahooClient, indicator: &MacroIndicatorConfig) -> Option<f64> {
    match indicator.symbol.as_deref() {
        Some(symbol) => match client.latest_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                log::warn!("宏观指标 {} ({}) 获取失败: {}", indicator.label, symbol, e);
                None
            }
        },
        None => indicator.value,
    }
}
