//! Weekly aggregation of item counts.

use crate::models::{AggregateRow, EnrichedRecord, PeriodKey};
use std::collections::BTreeMap;

/// Sum `count_items` per (year, month, week). Rows come back sorted by key;
/// empty input gives an empty summary.
pub fn aggregate(records: &[EnrichedRecord]) -> Vec<AggregateRow> {
    let mut totals: BTreeMap<PeriodKey, u64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.key()).or_insert(0) += r.record.count_items;
    }

    totals
        .into_iter()
        .map(|(key, total)| AggregateRow { key, total })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
