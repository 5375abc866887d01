use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::models::{
    Aggregation, CategoryTotal, GrandTotals, KpiComparison, KpiDelta, MetricDelta, MonthKey,
    MonthlyAggregate, ProductMonthQuantity, SalesRecord,
};

/// 月度累加器
#[derive(Debug, Clone, Default)]
struct MonthAccumulator {
    revenue: BigDecimal,
    transactions: usize,
}

impl MonthAccumulator {
    fn average_ticket(&self) -> BigDecimal {
        safe_div(&self.revenue, &BigDecimal::from(self.transactions as u64))
    }
}

/// 分类累加器
#[derive(Debug, Clone, Default)]
struct CategoryAccumulator {
    revenue: BigDecimal,
    quantity: u64,
    transactions: usize,
}

/// 比率类结果 (客单价、利润率) 保留的小数位
pub const RATIO_SCALE: i64 = 4;

/// 除数为 0 时返回 0
fn safe_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if denominator.is_zero() {
        BigDecimal::zero()
    } else {
        (numerator / denominator).with_scale(RATIO_SCALE)
    }
}

/// 净利率 (%)，收入为 0 时为 0
pub fn net_margin_pct(revenue: &BigDecimal, net_profit: &BigDecimal) -> BigDecimal {
    if revenue.is_zero() {
        BigDecimal::zero()
    } else {
        (net_profit / revenue * BigDecimal::from(100)).with_scale(RATIO_SCALE)
    }
}

/// 运营成本表: 基于未过滤数据的全部月份，每月固定金额
pub fn cost_schedule(all_months: &[MonthKey], operating_cost: &BigDecimal) -> IndexMap<MonthKey, BigDecimal> {
    all_months
        .iter()
        .map(|m| (*m, operating_cost.clone()))
        .collect()
}

fn group_by_month(filtered: &[&SalesRecord]) -> BTreeMap<MonthKey, MonthAccumulator> {
    let mut groups: BTreeMap<MonthKey, MonthAccumulator> = BTreeMap::new();
    for record in filtered {
        let acc = groups.entry(record.month).or_default();
        acc.revenue += &record.total_value;
        acc.transactions += 1;
    }
    groups
}

/// 月度收入 left join 成本表，只输出有收入行的月份
fn monthly_aggregates(
    groups: &BTreeMap<MonthKey, MonthAccumulator>,
    costs: &IndexMap<MonthKey, BigDecimal>,
) -> Vec<MonthlyAggregate> {
    groups
        .iter()
        .map(|(month, acc)| {
            let operating_cost = match costs.get(month) {
                Some(cost) => cost.clone(),
                None => {
                    tracing::warn!("Month {} has revenue but no operating cost entry", month);
                    BigDecimal::zero()
                }
            };
            let net_profit = &acc.revenue - &operating_cost;
            MonthlyAggregate {
                month: *month,
                revenue: acc.revenue.clone(),
                net_margin_pct: net_margin_pct(&acc.revenue, &net_profit),
                operating_cost,
                net_profit,
            }
        })
        .collect()
}

/// 最近两个月的对比；不足两个月时返回 Unavailable
fn compare_latest_months(groups: &BTreeMap<MonthKey, MonthAccumulator>) -> KpiComparison {
    let mut latest = groups.iter().rev();
    let (Some((current_month, current)), Some((previous_month, previous))) =
        (latest.next(), latest.next())
    else {
        return KpiComparison::Unavailable {
            months_present: groups.len(),
        };
    };

    let current_ticket = current.average_ticket();
    let previous_ticket = previous.average_ticket();

    KpiComparison::Available(KpiDelta {
        current_month: *current_month,
        previous_month: *previous_month,
        revenue: MetricDelta {
            delta: &current.revenue - &previous.revenue,
            current: current.revenue.clone(),
            previous: previous.revenue.clone(),
        },
        transactions: MetricDelta {
            current: current.transactions as i64,
            previous: previous.transactions as i64,
            delta: current.transactions as i64 - previous.transactions as i64,
        },
        average_ticket: MetricDelta {
            delta: &current_ticket - &previous_ticket,
            current: current_ticket,
            previous: previous_ticket,
        },
    })
}

fn grand_totals(monthly: &[MonthlyAggregate], transactions: usize) -> GrandTotals {
    let revenue: BigDecimal = monthly.iter().map(|m| &m.revenue).sum();
    let net_profit: BigDecimal = monthly.iter().map(|m| &m.net_profit).sum();
    let margin_sum: BigDecimal = monthly.iter().map(|m| &m.net_margin_pct).sum();

    GrandTotals {
        revenue,
        net_profit,
        mean_net_margin_pct: safe_div(&margin_sum, &BigDecimal::from(monthly.len() as u64)),
        transactions,
    }
}

fn category_totals<F>(filtered: &[&SalesRecord], label: F) -> Vec<CategoryTotal>
where
    F: Fn(&SalesRecord) -> &str,
{
    let mut groups: BTreeMap<&str, CategoryAccumulator> = BTreeMap::new();
    for record in filtered {
        let acc = groups.entry(label(record)).or_default();
        acc.revenue += &record.total_value;
        acc.quantity += u64::from(record.quantity);
        acc.transactions += 1;
    }

    groups
        .into_iter()
        .map(|(label, acc)| CategoryTotal {
            label: label.to_string(),
            revenue: acc.revenue,
            quantity: acc.quantity,
            transactions: acc.transactions,
        })
        .collect()
}

fn product_monthly_quantity(filtered: &[&SalesRecord]) -> Vec<ProductMonthQuantity> {
    let mut groups: BTreeMap<(MonthKey, &str), u64> = BTreeMap::new();
    for record in filtered {
        *groups.entry((record.month, record.product.as_str())).or_default() +=
            u64::from(record.quantity);
    }

    groups
        .into_iter()
        .map(|((month, product), quantity)| ProductMonthQuantity {
            month,
            product: product.to_string(),
            quantity,
        })
        .collect()
}

/// 聚合入口
///
/// `all_months` 为未过滤数据的月份列表，用于构建运营成本表；
/// 月度结果只包含过滤后有收入的月份。
pub fn aggregate(
    filtered: &[&SalesRecord],
    all_months: &[MonthKey],
    operating_cost: &BigDecimal,
) -> Aggregation {
    let groups = group_by_month(filtered);
    let costs = cost_schedule(all_months, operating_cost);
    let monthly = monthly_aggregates(&groups, &costs);

    Aggregation {
        kpis: compare_latest_months(&groups),
        totals: grand_totals(&monthly, filtered.len()),
        by_payment_method: category_totals(filtered, |r| r.payment_method.as_str()),
        by_state: category_totals(filtered, |r| r.state.as_str()),
        by_product: category_totals(filtered, |r| r.product.as_str()),
        product_monthly_quantity: product_monthly_quantity(filtered),
        monthly,
    }
}
