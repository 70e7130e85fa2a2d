pub mod core;
pub mod sales_csv;
pub mod trends;
