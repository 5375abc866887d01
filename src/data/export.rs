use std::io::Write;

use crate::error::Result;
use crate::models::SalesRecord;

/// 导出表头 (与导入格式一致，附加月份列)
pub const EXPORT_HEADERS: [&str; 7] = [
    "Data",
    "Produto",
    "Método de Pagamento",
    "Estado",
    "Quantidade",
    "Valor Total",
    "Mês",
];

/// 导出明细到 CSV
pub fn export_records_csv<'a, W, I>(records: I, writer: W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(EXPORT_HEADERS)?;

    let mut written = 0;
    for record in records {
        writer.write_record(&[
            record.date.format("%Y-%m-%d").to_string(),
            record.product.clone(),
            record.payment_method.clone(),
            record.state.clone(),
            record.quantity.to_string(),
            record.total_value.to_string(),
            record.month.to_string(),
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
