use bigdecimal::BigDecimal;
use std::io::Write;
use std::sync::Arc;

use crate::data::export_records_csv;
use crate::error::Result;
use crate::models::{
    DashboardState, FilterCriteria, FilterOptions, FilterRequest, KpiComparison, SalesRecord,
    SalesTable,
};
use crate::service::aggregator::aggregate;
use crate::service::filter::filter_records;

/// 过滤后按日期降序 (同日保持原顺序)
fn sorted_by_date_desc<'a>(mut records: Vec<&'a SalesRecord>) -> Vec<&'a SalesRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

/// 看板流水线: 过滤 -> 聚合 -> 明细排序
pub fn compute_dashboard_state(
    table: &SalesTable,
    criteria: &FilterCriteria,
    operating_cost: &BigDecimal,
) -> DashboardState {
    let filtered = filter_records(table.records(), criteria);
    let aggregation = aggregate(&filtered, table.months(), operating_cost);

    tracing::debug!(
        "Dashboard computed: {}/{} records, {} months",
        filtered.len(),
        table.len(),
        aggregation.monthly.len()
    );
    if let KpiComparison::Unavailable { months_present } = &aggregation.kpis {
        tracing::warn!(
            "KPI delta unavailable: need at least two months, filter kept {}",
            months_present
        );
    }

    DashboardState {
        criteria: criteria.clone(),
        aggregation,
        records: sorted_by_date_desc(filtered).into_iter().cloned().collect(),
    }
}

/// 看板服务: 持有只读销售表与固定运营成本
pub struct DashboardService {
    table: Arc<SalesTable>,
    operating_cost: BigDecimal,
}

impl DashboardService {
    pub fn new(table: Arc<SalesTable>, operating_cost: BigDecimal) -> Self {
        Self {
            table,
            operating_cost,
        }
    }

    /// 过滤控件默认值
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_table(&self.table)
    }

    /// 按请求计算看板状态
    pub fn compute(&self, request: &FilterRequest) -> Result<DashboardState> {
        let criteria = request.resolve(&self.table)?;
        Ok(compute_dashboard_state(&self.table, &criteria, &self.operating_cost))
    }

    /// 导出过滤后的明细 (日期降序)，返回写出行数
    pub fn export_csv<W: Write>(&self, request: &FilterRequest, writer: W) -> Result<usize> {
        let criteria = request.resolve(&self.table)?;
        let filtered = sorted_by_date_desc(filter_records(self.table.records(), &criteria));
        export_records_csv(filtered, writer)
    }
}
