//! 个股接口处理器
//!
//! ## API 列表
//! - GET /search?q= - 代码解析
//! - GET /stocks/{symbol}/quote - 公司行情与基本面
//! - GET /stocks/{symbol}/history - 最近一年日收盘价及区间表现
//! - GET /stocks/{symbol}/dividends - 最近分红记录
//! - GET /stocks/{symbol}/income - 年度利润表
//! - GET /stocks/{symbol}/news - 个股资讯

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use super::{error_response, AppState};
use crate::models::{
    ApiResponse, DividendRecord, IncomeStatementRow, NewsItem, PriceSeries, Quote, StockQuery,
};
use crate::services::format::format_signed_percent;
use crate::services::trend::TrendSet;

/// 历史数据及区间表现
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    #[serde(flatten)]
    pub series: PriceSeries,
    pub one_month: String,
    pub three_months: String,
    pub six_months: String,
    pub one_year: String,
}

/// 代码解析结果
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub ticker: String,
}

/// 代码解析
///
/// GET /api/v1/search?q=BNP
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<StockQuery>,
) -> Result<HttpResponse> {
    let text = match query.text() {
        Some(text) => text.to_string(),
        None => {
            let response = ApiResponse::<SearchResponse>::error("缺少查询参数 q".to_string());
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    match state.client.search_symbol(&text).await {
        Ok(ticker) => Ok(HttpResponse::Ok().json(ApiResponse::success(SearchResponse {
            query: text,
            ticker,
        }))),
        Err(e) => Ok(error_response::<SearchResponse>(&e)),
    }
}

/// 获取公司行情与基本面
///
/// GET /api/v1/stocks/{symbol}/quote
pub async fn get_quote(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match state.client.fetch_quote(&symbol).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        Err(e) => Ok(error_response::<Quote>(&e)),
    }
}

/// 获取最近一年日收盘价
///
/// GET /api/v1/stocks/{symbol}/history
///
/// 无历史数据时返回空序列，区间表现均为 "N/A"
pub async fn get_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match state.client.fetch_history(&symbol).await {
        Ok(series) => {
            let trends = TrendSet::from_series(&series);
            let response = HistoryResponse {
                series,
                one_month: format_signed_percent(trends.one_month),
                three_months: format_signed_percent(trends.three_months),
                six_months: format_signed_percent(trends.six_months),
                one_year: format_signed_percent(trends.one_year),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
        }
        Err(e) => Ok(error_response::<HistoryResponse>(&e)),
    }
}

/// 获取分红记录
///
/// GET /api/v1/stocks/{symbol}/dividends
pub async fn get_dividends(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match state.client.fetch_dividends(&symbol).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(error_response::<Vec<DividendRecord>>(&e)),
    }
}

/// 获取年度利润表
///
/// GET /api/v1/stocks/{symbol}/income
pub async fn get_income_statement(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match state.client.fetch_income_statement(&symbol).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Err(e) => Ok(error_response::<Vec<IncomeStatementRow>>(&e)),
    }
}

/// 获取个股资讯
///
/// GET /api/v1/stocks/{symbol}/news
///
/// 资讯获取失败时返回空列表
pub async fn get_news(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();
    let items: Vec<NewsItem> = state.client.news(&symbol).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::get().to(search)).service(
        web::scope("/stocks")
            .route("/{symbol}/quote", web::get().to(get_quote))
            .route("/{symbol}/history", web::get().to(get_history))
            .route("/{symbol}/dividends", web::get().to(get_dividends))
            .route("/{symbol}/income", web::get().to(get_income_statement))
            .route("/{symbol}/news", web::get().to(get_news)),
    );
}
