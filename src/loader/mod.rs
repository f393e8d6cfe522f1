//! CSV loader for the sales table.
//!
//! Required columns are located by header name (see `ColumnConfig`); any
//! other column is carried through untouched in `SalesRecord::extra`.

use crate::config::ColumnConfig;
use crate::error::LoadError;
use crate::models::SalesRecord;
use csv::StringRecord;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: usize,
    pub quantity: usize,
    pub category: usize,
    pub product_type: usize,
}

impl ColumnIndex {
    pub fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn { column: name.to_string() })
        };

        Ok(Self {
            date: find(&columns.date)?,
            quantity: find(&columns.quantity)?,
            category: find(&columns.category)?,
            product_type: find(&columns.product_type)?,
        })
    }

    fn is_required(&self, i: usize) -> bool {
        i == self.date || i == self.quantity || i == self.category || i == self.product_type
    }
}

/// Parse a quantity cell. Accepts plain non-negative integers only.
pub fn parse_quantity(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() || s.starts_with('-') {
        return None;
    }
    s.parse().ok()
}

/// Load the sales table from a file on disk.
pub fn load_csv(path: &Path, columns: &ColumnConfig, delimiter: u8) -> Result<Vec<SalesRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }
    if !path.is_file() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    debug!("Loading sales records from {:?}", path);

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = load_from_reader(file, columns, delimiter)?;
    info!("{:?}: {} records loaded", path, records.len());
    Ok(records)
}

/// Load the sales table from any reader. The header row is mandatory;
/// a header with no data rows yields an empty table.
///
/// The running item total must fit in a `u64`, so every later sum over
/// the loaded rows is overflow-free.
pub fn load_from_reader<R: Read>(
    reader: R,
    columns: &ColumnConfig,
    delimiter: u8,
) -> Result<Vec<SalesRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut records = Vec::new();
    let mut total_items: u64 = 0;

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = record
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);

        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        let quantity_raw = cell(index.quantity);
        let count_items = parse_quantity(quantity_raw).ok_or_else(|| LoadError::InvalidQuantity {
            row,
            value: quantity_raw.to_string(),
        })?;
        total_items = total_items
            .checked_add(count_items)
            .ok_or(LoadError::QuantityOverflow { row })?;

        let extra: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| !index.is_required(*i))
            .map(|(_, (h, v))| (h.to_string(), v.to_string()))
            .collect();

        records.push(SalesRecord {
            row,
            movement_date: cell(index.date).to_string(),
            count_items,
            category: cell(index.category).to_string(),
            product_type: cell(index.product_type).to_string(),
            extra,
        });
    }

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
