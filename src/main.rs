use std::sync::Arc;
use supplement_dashboard_rust::{api, load_sales_file, AppConfig, DashboardService};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 加载销售数据 (进程内只读一次，失败即退出)
    let table = Arc::new(load_sales_file(&config.dashboard.data_path)?);
    let service = Arc::new(DashboardService::new(
        table,
        config.dashboard.monthly_operating_cost.clone(),
    ));

    let app = api::router(service);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/dashboard/filters - filter defaults");
    info!("  GET  /api/dashboard         - dashboard for all data");
    info!("  POST /api/dashboard         - dashboard for a filter");
    info!("  POST /api/dashboard/export  - filtered records as CSV");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
