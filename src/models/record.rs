use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexSet;
use serde::{Serialize, Serializer};
use std::fmt;

use super::filter::DateRange;

/// 月份键 (年 + 月)，按 (year, month) 排序，与 "YYYY-MM" 字典序一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 销售记录 (CSV 一行)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub payment_method: String,
    pub state: String,
    pub quantity: u32,
    pub total_value: BigDecimal,
    pub month: MonthKey, // 加载时派生
}

impl SalesRecord {
    pub fn new(
        date: NaiveDate,
        product: impl Into<String>,
        payment_method: impl Into<String>,
        state: impl Into<String>,
        quantity: u32,
        total_value: BigDecimal,
    ) -> Self {
        Self {
            date,
            product: product.into(),
            payment_method: payment_method.into(),
            state: state.into(),
            quantity,
            total_value,
            month: MonthKey::from_date(date),
        }
    }
}

/// 已加载的销售表，加载后只读
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    months: Vec<MonthKey>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        let months: IndexSet<MonthKey> = records.iter().map(|r| r.month).collect();
        Self {
            records,
            months: months.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// 未过滤数据中出现过的全部月份 (首次出现顺序)
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 去重后的商品列表 (首次出现顺序)
    pub fn products(&self) -> Vec<String> {
        unique_labels(self.records.iter().map(|r| r.product.as_str()))
    }

    /// 去重后的支付方式列表 (首次出现顺序)
    pub fn payment_methods(&self) -> Vec<String> {
        unique_labels(self.records.iter().map(|r| r.payment_method.as_str()))
    }

    /// 数据覆盖的完整日期区间，空表时为 None
    pub fn date_span(&self) -> Option<DateRange> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some(DateRange { start: min, end: max })
    }
}

fn unique_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: IndexSet<&str> = labels.collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, product: &str, pay: &str) -> SalesRecord {
        SalesRecord::new(
            date.parse().unwrap(),
            product,
            pay,
            "SP",
            1,
            BigDecimal::from(10),
        )
    }

    #[test]
    fn month_key_order_matches_text_order() {
        let keys = [
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 1),
            MonthKey::new(2024, 2),
            MonthKey::new(2024, 10),
        ];
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].to_string() < pair[1].to_string());
        }
        assert_eq!(MonthKey::new(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn month_key_serializes_as_text() {
        let json = serde_json::to_string(&MonthKey::new(2024, 7)).unwrap();
        assert_eq!(json, "\"2024-07\"");
    }

    #[test]
    fn table_collects_months_and_labels_in_first_seen_order() {
        let table = SalesTable::new(vec![
            record("2024-02-10", "Whey", "Pix"),
            record("2024-01-05", "Creatina", "Cartão"),
            record("2024-02-11", "Whey", "Boleto"),
        ]);

        assert_eq!(
            table.months(),
            &[MonthKey::new(2024, 2), MonthKey::new(2024, 1)]
        );
        assert_eq!(table.products(), vec!["Whey", "Creatina"]);
        assert_eq!(table.payment_methods(), vec!["Pix", "Cartão", "Boleto"]);

        let span = table.date_span().unwrap();
        assert_eq!(span.start.to_string(), "2024-01-05");
        assert_eq!(span.end.to_string(), "2024-02-11");
    }

    #[test]
    fn empty_table_has_no_span() {
        let table = SalesTable::default();
        assert!(table.is_empty());
        assert!(table.date_span().is_none());
        assert!(table.months().is_empty());
    }
}
