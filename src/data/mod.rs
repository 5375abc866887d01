pub mod export;
pub mod loader;

pub use export::export_records_csv;
pub use loader::{load_sales, load_sales_file};
