use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::record::{MonthKey, SalesRecord, SalesTable};
use crate::error::{DashboardError, Result};

/// 闭区间日期范围 (start <= end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidFilter(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// 过滤条件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub products: IndexSet<String>,
    pub payment_methods: IndexSet<String>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// 默认条件：全部商品、全部支付方式、完整日期区间
    pub fn all(table: &SalesTable) -> Self {
        Self {
            products: table.products().into_iter().collect(),
            payment_methods: table.payment_methods().into_iter().collect(),
            date_range: table.date_span().unwrap_or_else(DateRange::unbounded),
        }
    }

    /// 三个条件同时满足才保留
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.products.contains(&record.product)
            && self.payment_methods.contains(&record.payment_method)
            && self.date_range.contains(record.date)
    }
}

/// 请求体: 过滤条件
///
/// 列表缺省表示"全部"，显式空列表表示"无"；日期缺省取数据的完整区间。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub products: Option<Vec<String>>,
    #[serde(default)]
    pub payment_methods: Option<Vec<String>>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl FilterRequest {
    pub fn resolve(&self, table: &SalesTable) -> Result<FilterCriteria> {
        let products = match &self.products {
            Some(list) => list.iter().cloned().collect(),
            None => table.products().into_iter().collect(),
        };
        let payment_methods = match &self.payment_methods {
            Some(list) => list.iter().cloned().collect(),
            None => table.payment_methods().into_iter().collect(),
        };

        // 只给出一端时，缺省端取数据区间但不越过给定端
        let span = table.date_span().unwrap_or_else(DateRange::unbounded);
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, span.end.max(start)),
            (None, Some(end)) => (span.start.min(end), end),
            (None, None) => (span.start, span.end),
        };
        let date_range = DateRange::new(start, end)?;

        Ok(FilterCriteria {
            products,
            payment_methods,
            date_range,
        })
    }
}

/// 过滤控件默认值
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub products: Vec<String>,
    pub payment_methods: Vec<String>,
    pub date_span: Option<DateRange>,
    pub months: Vec<MonthKey>,
    pub record_count: usize,
}

impl FilterOptions {
    pub fn from_table(table: &SalesTable) -> Self {
        let mut months = table.months().to_vec();
        months.sort();
        Self {
            products: table.products(),
            payment_methods: table.payment_methods(),
            date_span: table.date_span(),
            months,
            record_count: table.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn table() -> SalesTable {
        SalesTable::new(vec![
            SalesRecord::new(date("2024-01-05"), "Whey", "Pix", "SP", 1, BigDecimal::from(100)),
            SalesRecord::new(date("2024-03-20"), "BCAA", "Boleto", "RJ", 2, BigDecimal::from(80)),
        ])
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let err = DateRange::new(date("2024-02-01"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidFilter(_)));
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();
        assert!(range.contains(date("2024-01-01")));
        assert!(range.contains(date("2024-01-31")));
        assert!(!range.contains(date("2024-02-01")));
    }

    #[test]
    fn empty_request_resolves_to_defaults() {
        let table = table();
        let criteria = FilterRequest::default().resolve(&table).unwrap();
        assert_eq!(criteria, FilterCriteria::all(&table));
        assert_eq!(criteria.date_range.start, date("2024-01-05"));
        assert_eq!(criteria.date_range.end, date("2024-03-20"));
    }

    #[test]
    fn explicit_empty_list_selects_nothing() {
        let table = table();
        let request = FilterRequest {
            products: Some(vec![]),
            ..Default::default()
        };
        let criteria = request.resolve(&table).unwrap();
        assert!(criteria.products.is_empty());
        assert!(table.records().iter().all(|r| !criteria.matches(r)));
    }

    #[test]
    fn request_with_inverted_dates_is_rejected() {
        let request = FilterRequest {
            start: Some(date("2024-03-01")),
            end: Some(date("2024-02-01")),
            ..Default::default()
        };
        assert!(request.resolve(&table()).is_err());
    }

    #[test]
    fn open_ended_range_beyond_data_selects_nothing() {
        let table = table();
        let after = FilterRequest {
            start: Some(date("2025-01-01")),
            ..Default::default()
        };
        let criteria = after.resolve(&table).unwrap();
        assert_eq!(criteria.date_range.start, date("2025-01-01"));
        assert_eq!(criteria.date_range.end, date("2025-01-01"));
        assert!(table.records().iter().all(|r| !criteria.matches(r)));

        let before = FilterRequest {
            end: Some(date("2023-06-30")),
            ..Default::default()
        };
        let criteria = before.resolve(&table).unwrap();
        assert_eq!(criteria.date_range.start, date("2023-06-30"));
        assert!(table.records().iter().all(|r| !criteria.matches(r)));
    }

    #[test]
    fn open_ended_range_inside_data_keeps_span_bound() {
        let request = FilterRequest {
            start: Some(date("2024-02-01")),
            ..Default::default()
        };
        let criteria = request.resolve(&table()).unwrap();
        assert_eq!(criteria.date_range.end, date("2024-03-20"));
    }

    #[test]
    fn request_deserializes_with_missing_fields() {
        let request: FilterRequest =
            serde_json::from_str(r#"{"products": ["Whey"], "start": "2024-01-01"}"#).unwrap();
        assert_eq!(request.products, Some(vec!["Whey".to_string()]));
        assert!(request.payment_methods.is_none());
        assert_eq!(request.start, Some(date("2024-01-01")));
        assert!(request.end.is_none());
    }

    #[test]
    fn options_list_sorted_months() {
        let options = FilterOptions::from_table(&table());
        assert_eq!(options.months, vec![MonthKey::new(2024, 1), MonthKey::new(2024, 3)]);
        assert_eq!(options.record_count, 2);
    }
}
