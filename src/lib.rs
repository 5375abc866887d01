pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use data::{load_sales, load_sales_file};
pub use error::{DashboardError, Result};
pub use service::{compute_dashboard_state, DashboardService};
