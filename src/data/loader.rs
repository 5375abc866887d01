use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{DashboardError, Result};
use crate::models::{SalesRecord, SalesTable};

/// 必需列: (葡语表头, 英文别名)
pub const REQUIRED_COLUMNS: [(&str, &str); 6] = [
    ("Data", "date"),
    ("Produto", "product"),
    ("Método de Pagamento", "payment_method"),
    ("Estado", "state"),
    ("Quantidade", "quantity"),
    ("Valor Total", "total_value"),
];

/// CSV 原始行，字段先按文本读入再逐个解析，以便报告行号
#[derive(Debug, Deserialize)]
struct RawSalesRow {
    #[serde(rename = "Data", alias = "date")]
    date: String,
    #[serde(rename = "Produto", alias = "product")]
    product: String,
    #[serde(rename = "Método de Pagamento", alias = "payment_method")]
    payment_method: String,
    #[serde(rename = "Estado", alias = "state")]
    state: String,
    #[serde(rename = "Quantidade", alias = "quantity")]
    quantity: String,
    #[serde(rename = "Valor Total", alias = "total_value")]
    total_value: String,
}

impl RawSalesRow {
    fn into_record(self, line: u64) -> Result<SalesRecord> {
        let date = parse_date(&self.date).ok_or_else(|| {
            DashboardError::data_format(line, format!("unparseable date '{}'", self.date))
        })?;

        let quantity: u32 = self.quantity.parse().map_err(|_| {
            DashboardError::data_format(line, format!("invalid quantity '{}'", self.quantity))
        })?;

        let total_value = BigDecimal::from_str(&self.total_value).map_err(|_| {
            DashboardError::data_format(line, format!("invalid total value '{}'", self.total_value))
        })?;
        if total_value < BigDecimal::zero() {
            return Err(DashboardError::data_format(
                line,
                format!("negative total value '{}'", self.total_value),
            ));
        }

        Ok(SalesRecord::new(
            date,
            self.product,
            self.payment_method,
            self.state,
            quantity,
            total_value,
        ))
    }
}

/// 解析日期列，时间部分丢弃
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(value, "%d/%m/%Y").ok())
}

fn check_columns(headers: &csv::StringRecord) -> Result<()> {
    for (name, alias) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name || h == alias) {
            return Err(DashboardError::data_format(
                1,
                format!("missing required column '{}'", name),
            ));
        }
    }
    Ok(())
}

/// 列数不符的行按数据格式错误报告行号
fn row_error(err: csv::Error) -> DashboardError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return DashboardError::data_format(
            pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            format!("expected {} fields, found {}", expected_len, len),
        );
    }
    err.into()
}

/// 从任意 reader 加载销售数据
pub fn load_sales<R: Read>(reader: R) -> Result<SalesTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    check_columns(&headers)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(row_error)?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawSalesRow = row
            .deserialize(Some(&headers))
            .map_err(|e| DashboardError::data_format(line, e.to_string()))?;
        records.push(raw.into_record(line)?);
    }

    Ok(SalesTable::new(records))
}

/// 从 CSV 文件加载销售数据
pub fn load_sales_file(path: &Path) -> Result<SalesTable> {
    let file = File::open(path)?;
    let table = load_sales(file)?;
    tracing::info!(
        "Loaded {} sales records ({} months) from {}",
        table.len(),
        table.months().len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthKey;
    use rstest::rstest;

    const HEADER: &str = "Data,Produto,Método de Pagamento,Estado,Quantidade,Valor Total";

    #[test]
    fn loads_portuguese_headers_and_derives_month() {
        let csv = format!(
            "{HEADER}\n2024-01-05,Whey Protein,Pix,SP,1,100.00\n2024-02-10,Whey Protein,Pix,RJ,2,150\n"
        );
        let table = load_sales(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.product, "Whey Protein");
        assert_eq!(first.payment_method, "Pix");
        assert_eq!(first.quantity, 1);
        assert_eq!(first.total_value, BigDecimal::from(100));
        assert_eq!(first.month, MonthKey::new(2024, 1));
        assert_eq!(table.months(), &[MonthKey::new(2024, 1), MonthKey::new(2024, 2)]);
    }

    #[test]
    fn accepts_english_headers_and_extra_columns() {
        let csv = "id,date,product,payment_method,state,quantity,total_value,customer\n\
                   1, 2024-03-01 ,Creatina,Boleto,MG,3,89.70,Ana\n";
        let table = load_sales(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(table.records()[0].state, "MG");
    }

    #[rstest]
    #[case("2024-01-05")]
    #[case("2024-01-05 13:45:00")]
    #[case("2024-01-05T13:45:00")]
    #[case("05/01/2024")]
    fn parses_supported_date_formats(#[case] raw: &str) {
        assert_eq!(parse_date(raw), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn missing_column_is_data_format_error() {
        let csv = "Data,Produto,Estado,Quantidade,Valor Total\n2024-01-05,Whey,SP,1,100\n";
        match load_sales(csv.as_bytes()).unwrap_err() {
            DashboardError::DataFormat { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("Método de Pagamento"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case("not-a-date,Whey,Pix,SP,1,100", "unparseable date")]
    #[case("2024-13-40,Whey,Pix,SP,1,100", "unparseable date")]
    #[case(",Whey,Pix,SP,1,100", "unparseable date")]
    #[case("2024-01-05,Whey,Pix,SP,-1,100", "invalid quantity")]
    #[case("2024-01-05,Whey,Pix,SP,1,abc", "invalid total value")]
    #[case("2024-01-05,Whey,Pix,SP,1,-5", "negative total value")]
    fn malformed_rows_report_their_line(#[case] row: &str, #[case] expected: &str) {
        let csv = format!("{HEADER}\n2024-01-04,Whey,Pix,SP,1,100\n{row}\n");
        match load_sales(csv.as_bytes()).unwrap_err() {
            DashboardError::DataFormat { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains(expected), "message was: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_row_is_data_format_error() {
        let csv = format!("{HEADER}\n2024-01-04,Whey,Pix,SP,1,100\n2024-01-05,Whey,Pix\n");
        match load_sales(csv.as_bytes()).unwrap_err() {
            DashboardError::DataFormat { line, message } => {
                assert_eq!(line, 3);
                assert_eq!(message, "expected 6 fields, found 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_sales_file(Path::new("/nonexistent/vendas.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
    }

    #[test]
    fn header_only_file_loads_empty_table() {
        let table = load_sales(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(table.is_empty());
    }
}
