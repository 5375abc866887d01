pub mod aggregator;
pub mod dashboard;
pub mod filter;

pub use aggregator::aggregate;
pub use dashboard::{compute_dashboard_state, DashboardService};
pub use filter::filter_records;
