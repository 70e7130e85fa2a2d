//! Historical domain sales loader
//!
//! Expects a CSV with at least the columns `Domain`, `Price` and `Date`
//! (ISO `YYYY-MM-DD`, a trailing time part is ignored). Extra columns are allowed.

use crate::domain::errors::ValuationError;
use crate::domain::valuation::{SaleRecord, SalesTable};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: &[&str] = &["Domain", "Price", "Date"];

#[derive(Debug, Deserialize)]
struct RawSaleRow {
    #[serde(rename = "Domain")]
    domain: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Date")]
    date: String,
}

pub fn load_sales_csv(path: &Path) -> Result<SalesTable, ValuationError> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(ValuationError::DataUnavailable {
            path: label,
            reason: "file not found".to_string(),
        });
    }

    let file = File::open(path).map_err(|e| ValuationError::DataUnavailable {
        path: label.clone(),
        reason: e.to_string(),
    })?;

    let table = read_sales(BufReader::new(file), &label)?;
    info!(
        "Loaded {} sales records from {} ({} rows skipped)",
        table.len(),
        label,
        table.skipped_rows
    );
    Ok(table)
}

pub fn read_sales<R: Read>(reader: R, label: &str) -> Result<SalesTable, ValuationError> {
    let unavailable = |reason: String| ValuationError::DataUnavailable {
        path: label.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| unavailable(e.to_string()))?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(unavailable(format!("missing column '{}'", column)));
        }
    }

    let mut table = SalesTable::default();
    for (line, result) in rdr.deserialize::<RawSaleRow>().enumerate() {
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(parse_row);
        match parsed {
            Ok(record) => table.records.push(record),
            Err(reason) => {
                // +2: header line and 1-based numbering
                warn!("Skipping sales row {} in {}: {}", line + 2, label, reason);
                table.skipped_rows += 1;
            }
        }
    }

    if table.is_empty() {
        return Err(unavailable("no valid sales rows".to_string()));
    }
    Ok(table)
}

fn parse_row(raw: RawSaleRow) -> Result<SaleRecord, String> {
    if raw.domain.is_empty() {
        return Err("empty domain".to_string());
    }

    let price_text: String = raw
        .price
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let price = price_text
        .parse::<f64>()
        .map_err(|e| format!("bad price '{}': {}", raw.price, e))?;

    let date_text = raw.date.get(..10).unwrap_or(&raw.date);
    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
        .map_err(|e| format!("bad date '{}': {}", raw.date, e))?;

    Ok(SaleRecord::new(raw.domain, price, date))
}
