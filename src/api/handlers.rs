use crate::error::DashboardError;
use crate::models::{DashboardState, FilterOptions, FilterRequest};
use crate::service::DashboardService;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// 响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Response {
        let body = Self {
            success: true,
            message: message.into(),
            data: Some(data),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

fn error_response(err: &DashboardError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::error!("Dashboard request failed: {}", err);

    let body = ApiResponse::<()> {
        success: false,
        message: format!("Error: {}", err),
        data: None,
    };
    (status, Json(body)).into_response()
}

fn dashboard_response(result: Result<DashboardState, DashboardError>) -> Response {
    match result {
        Ok(state) => {
            let message = format!(
                "{} records, {} months",
                state.records.len(),
                state.aggregation.monthly.len()
            );
            ApiResponse::ok(message, state)
        }
        Err(e) => error_response(&e),
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 过滤控件默认值
pub async fn filter_options(State(service): State<Arc<DashboardService>>) -> Response {
    let options: FilterOptions = service.filter_options();
    let message = format!(
        "{} products, {} payment methods",
        options.products.len(),
        options.payment_methods.len()
    );
    ApiResponse::ok(message, options)
}

/// 默认条件下的看板
pub async fn default_dashboard(State(service): State<Arc<DashboardService>>) -> Response {
    dashboard_response(service.compute(&FilterRequest::default()))
}

/// 按过滤条件计算看板
pub async fn filtered_dashboard(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<FilterRequest>,
) -> Response {
    dashboard_response(service.compute(&req))
}

/// 导出过滤后的明细 CSV
pub async fn export_records(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<FilterRequest>,
) -> Response {
    let mut buf = Vec::new();
    match service.export_csv(&req, &mut buf) {
        Ok(rows) => {
            tracing::info!("Exported {} records", rows);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"vendas_filtradas.csv\""),
                ],
                buf,
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}
