use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One historical domain sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

impl SaleRecord {
    pub fn new(domain: impl Into<String>, price: f64, date: NaiveDate) -> Self {
        Self {
            domain: domain.into(),
            price,
            date,
        }
    }
}

/// Loaded sales history
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    pub records: Vec<SaleRecord>,
    /// Rows dropped while reading (bad price, bad date, missing column)
    pub skipped_rows: usize,
}

impl SalesTable {
    pub fn new(records: Vec<SaleRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
