use crate::models::{FilterCriteria, SalesRecord};

/// 按条件过滤记录，保持输入顺序
pub fn filter_records<'a>(
    records: &'a [SalesRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a SalesRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}
