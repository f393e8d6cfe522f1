//! The immutable dataset behind the dashboard and its read-only views.

use crate::aggregator::aggregate;
use crate::error::ParseError;
use crate::models::{AggregateRow, CategoryCount, EnrichedRecord, ProductTypeTotal};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Enriched records plus their weekly summary, built once and never mutated.
/// Share between readers with `Arc<SalesDataset>`.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<EnrichedRecord>,
    summary: Vec<AggregateRow>,
    skipped: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatasetStats {
    pub records: usize,
    pub skipped: usize,
    pub total_items: u64,
    pub weeks: usize,
    pub categories: usize,
    pub product_types: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl SalesDataset {
    #[cfg(test)]
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self::with_skipped(records, Vec::new())
    }

    pub fn with_skipped(records: Vec<EnrichedRecord>, skipped: Vec<ParseError>) -> Self {
        let summary = aggregate(&records);
        Self {
            records,
            summary,
            skipped,
        }
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    /// Weekly totals, ordered by (year, month, week).
    pub fn time_series(&self) -> &[AggregateRow] {
        &self.summary
    }

    pub fn by_category(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn by_product_type(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[ParseError] {
        &self.skipped
    }

    // ── Derived ───────────────────────────────────────────────────────────────

    /// Row count per category, largest first (ties by name).
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in self.by_category() {
            *counts.entry(r.record.category.as_str()).or_insert(0) += 1;
        }

        let mut out: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, rows)| CategoryCount {
                category: category.to_string(),
                rows,
            })
            .collect();
        out.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.category.cmp(&b.category)));
        out
    }

    /// Items sold per product type, by product type name.
    pub fn product_type_totals(&self) -> Vec<ProductTypeTotal> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for r in self.by_product_type() {
            *totals.entry(r.record.product_type.as_str()).or_insert(0) += r.record.count_items;
        }

        totals
            .into_iter()
            .map(|(product_type, total)| ProductTypeTotal {
                product_type: product_type.to_string(),
                total,
            })
            .collect()
    }

    /// Distinct calendar years present in the time series.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.summary.iter().map(|r| r.key.year).collect();
        years.into_iter().collect()
    }

    pub fn total_items(&self) -> u64 {
        self.records.iter().map(|r| r.record.count_items).sum()
    }

    pub fn stats(&self) -> DatasetStats {
        let categories: BTreeSet<&str> = self.records.iter().map(|r| r.record.category.as_str()).collect();
        let product_types: BTreeSet<&str> =
            self.records.iter().map(|r| r.record.product_type.as_str()).collect();

        DatasetStats {
            records: self.records.len(),
            skipped: self.skipped.len(),
            total_items: self.total_items(),
            weeks: self.summary.len(),
            categories: categories.len(),
            product_types: product_types.len(),
            first_date: self.records.iter().map(|r| r.date).min(),
            last_date: self.records.iter().map(|r| r.date).max(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::enrich_with_date;
    use crate::models::{PeriodKey, SalesRecord};
    use std::sync::Arc;

    fn rec(date: (i32, u32, u32), count: u64, category: &str, product_type: &str) -> EnrichedRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        enrich_with_date(
            SalesRecord {
                row: 0,
                movement_date: date.to_string(),
                count_items: count,
                category: category.into(),
                product_type: product_type.into(),
                extra: Default::default(),
            },
            date,
        )
    }

    fn sample() -> SalesDataset {
        SalesDataset::new(vec![
            rec((2024, 1, 2), 5, "ANILLOS", "ORO"),
            rec((2024, 1, 3), 3, "ANILLOS", "PLATA"),
            rec((2024, 1, 9), 7, "COLLARES", "ORO"),
            rec((2024, 12, 30), 2, "ARETES", "PLATA"),
            rec((2025, 1, 6), 1, "COLLARES", "ACERO"),
        ])
    }

    #[test]
    fn test_time_series() {
        let ds = sample();
        let keys: Vec<(i32, u32, u32, u64)> = ds
            .time_series()
            .iter()
            .map(|r| (r.key.year, r.key.month, r.key.week, r.total))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2024, 1, 1, 8),
                (2024, 1, 2, 7),
                (2024, 12, 1, 2),
                (2025, 1, 2, 1),
            ]
        );
        assert_eq!(ds.years(), vec![2024, 2025]);
        assert_eq!(
            ds.time_series()[2].key,
            PeriodKey { year: 2024, month: 12, week: 1 }
        );
    }

    #[test]
    fn test_sum_invariant() {
        let ds = sample();
        let series: u64 = ds.time_series().iter().map(|r| r.total).sum();
        let bars: u64 = ds.product_type_totals().iter().map(|t| t.total).sum();
        assert_eq!(series, ds.total_items());
        assert_eq!(bars, ds.total_items());
        assert_eq!(ds.total_items(), 18);
    }

    #[test]
    fn test_category_counts() {
        let counts = sample().category_counts();
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.category.as_str(), c.rows)).collect();
        assert_eq!(pairs, vec![("ANILLOS", 2), ("COLLARES", 2), ("ARETES", 1)]);
    }

    #[test]
    fn test_product_type_totals() {
        let totals = sample().product_type_totals();
        let pairs: Vec<(&str, u64)> = totals.iter().map(|t| (t.product_type.as_str(), t.total)).collect();
        assert_eq!(pairs, vec![("ACERO", 1), ("ORO", 12), ("PLATA", 5)]);
    }

    #[test]
    fn test_views_share_records() {
        let ds = sample();
        assert_eq!(ds.by_category().len(), 5);
        assert!(std::ptr::eq(ds.by_category(), ds.by_product_type()));
    }

    #[test]
    fn test_stats_and_empty() {
        let stats = sample().stats();
        assert_eq!(stats.records, 5);
        assert_eq!(stats.weeks, 4);
        assert_eq!(stats.categories, 3);
        assert_eq!(stats.product_types, 3);
        assert_eq!(stats.first_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2025, 1, 6));

        let empty = SalesDataset::new(vec![]);
        assert!(empty.time_series().is_empty());
        assert!(empty.category_counts().is_empty());
        assert_eq!(empty.stats().first_date, None);
    }

    #[test]
    fn test_shared_between_threads() {
        let ds = Arc::new(sample());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ds = Arc::clone(&ds);
                std::thread::spawn(move || ds.time_series().len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 4);
        }
    }
}
