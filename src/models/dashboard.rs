use bigdecimal::BigDecimal;
use serde::Serialize;

use super::filter::FilterCriteria;
use super::record::{MonthKey, SalesRecord};

/// 月度汇总 (收入、运营成本、净利润、净利率)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    pub revenue: BigDecimal,
    pub operating_cost: BigDecimal,
    pub net_profit: BigDecimal,
    pub net_margin_pct: BigDecimal, // revenue 为 0 时取 0
}

/// 单项指标: 当月、上月及差值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta<T> {
    pub current: T,
    pub previous: T,
    pub delta: T,
}

/// 最近两个月的 KPI 对比
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDelta {
    pub current_month: MonthKey,
    pub previous_month: MonthKey,
    pub revenue: MetricDelta<BigDecimal>,
    pub transactions: MetricDelta<i64>,
    pub average_ticket: MetricDelta<BigDecimal>,
}

/// KPI 对比结果；不足两个月时为 Unavailable (非错误)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KpiComparison {
    Available(KpiDelta),
    Unavailable { months_present: usize },
}

impl KpiComparison {
    pub fn delta(&self) -> Option<&KpiDelta> {
        match self {
            Self::Available(delta) => Some(delta),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.delta().is_some()
    }
}

/// 过滤结果整体汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrandTotals {
    pub revenue: BigDecimal,
    pub net_profit: BigDecimal,
    pub mean_net_margin_pct: BigDecimal,
    pub transactions: usize,
}

/// 分类汇总 (支付方式 / 州 / 商品)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub revenue: BigDecimal,
    pub quantity: u64,
    pub transactions: usize,
}

/// 商品按月销量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMonthQuantity {
    pub month: MonthKey,
    pub product: String,
    pub quantity: u64,
}

/// 聚合引擎输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub kpis: KpiComparison,
    pub totals: GrandTotals,
    pub monthly: Vec<MonthlyAggregate>,
    pub by_payment_method: Vec<CategoryTotal>,
    pub by_state: Vec<CategoryTotal>,
    pub by_product: Vec<CategoryTotal>,
    pub product_monthly_quantity: Vec<ProductMonthQuantity>,
}

/// 看板完整状态 (一次过滤的全部输出)
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub criteria: FilterCriteria,
    #[serde(flatten)]
    pub aggregation: Aggregation,
    /// 过滤后的明细，按日期降序
    pub records: Vec<SalesRecord>,
}
