use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Source row ────────────────────────────────────────────────────────────────

/// One row of the sales table, as read. The date is still raw text;
/// the enricher turns it into a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    /// 1-based line in the source file (header is line 1).
    pub row: u64,
    pub movement_date: String,
    pub count_items: u64,
    pub category: String,
    pub product_type: String,
    /// Every other column, keyed by header name.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

// ── Enriched row ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: SalesRecord,
    pub date: NaiveDate,
    /// Calendar year.
    pub year: i32,
    pub month: u32,
    /// ISO-8601 week number (1..=53).
    pub week: u32,
    /// ISO week-numbering year; differs from `year` around Jan 1.
    pub iso_year: i32,
}

impl EnrichedRecord {
    pub fn key(&self) -> PeriodKey {
        PeriodKey {
            year: self.year,
            month: self.month,
            week: self.week,
        }
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Grouping key of the weekly time series. Ordered by (year, month, week).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl PeriodKey {
    /// ISO year implied by the key: a December date in week 1 belongs to
    /// the next ISO year, a January date in week 52/53 to the previous one.
    pub fn iso_year(&self) -> i32 {
        match (self.month, self.week) {
            (12, 1) => self.year + 1,
            (1, w) if w >= 52 => self.year - 1,
            _ => self.year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateRow {
    #[serde(flatten)]
    pub key: PeriodKey,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductTypeTotal {
    pub product_type: String,
    pub total: u64,
}
