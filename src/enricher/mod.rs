//! Temporal enrichment: raw date text → calendar date + year / month / ISO week.

use crate::config::{EnrichConfig, ParsePolicy};
use crate::error::ParseError;
use crate::models::{EnrichedRecord, SalesRecord};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Try each format in order. Formats carrying time fields are parsed as
/// date-times and truncated to the date.
pub fn parse_date<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in formats {
        let fmt = fmt.as_ref();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    None
}

/// Attach the derived calendar fields to a record whose date is known.
pub fn enrich_with_date(record: SalesRecord, date: NaiveDate) -> EnrichedRecord {
    let iso = date.iso_week();
    EnrichedRecord {
        record,
        date,
        year: date.year(),
        month: date.month(),
        week: iso.week(),
        iso_year: iso.year(),
    }
}

pub fn enrich_record<S: AsRef<str>>(
    record: SalesRecord,
    formats: &[S],
) -> Result<EnrichedRecord, ParseError> {
    match parse_date(&record.movement_date, formats) {
        Some(date) => Ok(enrich_with_date(record, date)),
        None => Err(ParseError {
            row: record.row,
            value: record.movement_date,
        }),
    }
}

/// Output of a full enrichment pass.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    /// Rows dropped under the lenient policy.
    pub skipped: Vec<ParseError>,
}

pub struct Enricher<'a> {
    config: &'a EnrichConfig,
}

impl<'a> Enricher<'a> {
    pub fn new(config: &'a EnrichConfig) -> Self {
        Self { config }
    }

    /// Enrich every record. Under `Strict` the first bad date aborts the
    /// pass; under `Lenient` it is logged and skipped.
    pub fn enrich_all(&self, records: Vec<SalesRecord>) -> Result<Enrichment, ParseError> {
        let mut out = Enrichment {
            records: Vec::with_capacity(records.len()),
            skipped: Vec::new(),
        };

        for record in records {
            match enrich_record(record, &self.config.date_formats) {
                Ok(r) => out.records.push(r),
                Err(e) if self.config.policy == ParsePolicy::Lenient => {
                    warn!("Skipping {}", e);
                    out.skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "{} records enriched, {} skipped",
            out.records.len(),
            out.skipped.len()
        );
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
