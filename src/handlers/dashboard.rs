//! 看板接口处理器
//!
//! ## API 列表
//! - GET /dashboard?q= - 完整看板（概况、基本面、走势、分红、利润表、资讯）
//! - GET /macro - 宏观侧栏（国债收益率、汇率）

use actix_web::{web, HttpResponse, Result};

use super::{error_response, AppState};
use crate::models::{ApiResponse, Dashboard, StockQuery};
use crate::services::dashboard_service;

/// 获取完整看板
///
/// GET /api/v1/dashboard?q=BNP
///
/// 代码无法解析时返回 404，其余数据源失败只影响对应分区
pub async fn get_dashboard(
    state: web::Data<AppState>,
    query: web::Query<StockQuery>,
) -> Result<HttpResponse> {
    let text = match query.text() {
        Some(text) => text.to_string(),
        None => {
            let response = ApiResponse::<Dashboard>::error("缺少查询参数 q".to_string());
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    match dashboard_service::build_dashboard(&state.client, &text).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard))),
        Err(e) => Ok(error_response::<Dashboard>(&e)),
    }
}

/// 获取宏观侧栏
///
/// GET /api/v1/macro
pub async fn get_macro(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot =
        dashboard_service::build_macro_snapshot(&state.client, &state.macro_indicators).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard))
        .route("/macro", web::get().to(get_macro));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, MacroConfig, ProviderConfig};
    use crate::services::yahoo::YahooClient;
    use actix_web::{http::StatusCode, test, App};
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn state_for(base: &str) -> web::Data<AppState> {
        web::Data::new(AppState {
            client: YahooClient::new(&ApiConfig::default(), ProviderConfig::with_base(base)).unwrap(),
            macro_indicators: MacroConfig {
                rates: vec![],
                fx: MacroConfig::default().fx,
            },
        })
    }

    /// 测试缺少查询参数
    #[actix_web::test]
    async fn test_dashboard_requires_query() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/dashboard?q=%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    /// 测试代码无法解析返回 404
    #[actix_web::test]
    async fn test_dashboard_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/finance/search");
                then.status(200).json_body(json!({"quotes": []}));
            })
            .await;

        let app = test::init_service(
            App::new()
                .app_data(state_for(&server.base_url()))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/dashboard?q=unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    /// 测试宏观侧栏接口
    #[actix_web::test]
    async fn test_macro_endpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v8/finance/chart/JPY=X");
                then.status(200).json_body(json!({
                    "chart": {"result": [{"meta": {"regularMarketPrice": 151.237}}], "error": null}
                }));
            })
            .await;

        let app = test::init_service(
            App::new()
                .app_data(state_for(&server.base_url()))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/macro").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["rates"], json!([]));
        assert_eq!(body["data"]["fx"][0]["label"], "USD / JPY");
        assert_eq!(body["data"]["fx"][0]["value"], "151.24");
    }

    /// 测试健康检查
    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
