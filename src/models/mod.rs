pub mod dashboard;
pub mod filter;
pub mod record;

pub use dashboard::{
    Aggregation, CategoryTotal, DashboardState, GrandTotals, KpiComparison, KpiDelta,
    MetricDelta, MonthlyAggregate, ProductMonthQuantity,
};
pub use filter::{DateRange, FilterCriteria, FilterOptions, FilterRequest};
pub use record::{MonthKey, SalesRecord, SalesTable};
