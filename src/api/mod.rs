pub mod handlers;

pub use handlers::*;

use crate::service::DashboardService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 构建看板路由
pub fn router(service: Arc<DashboardService>) -> Router {
    let dashboard_routes = Router::new()
        .route("/api/dashboard", get(default_dashboard).post(filtered_dashboard))
        .route("/api/dashboard/filters", get(filter_options))
        .route("/api/dashboard/export", post(export_records))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(dashboard_routes)
        .layer(ServiceBuilder::new())
}
