//! Pipeline orchestrator: ties loader → enricher → aggregator together.
//!
//! Runs once per process. The result is an immutable `SalesDataset`; every
//! later query reads from it without recomputation.

use crate::config::AppConfig;
use crate::dataset::SalesDataset;
use crate::enricher::Enricher;
use crate::error::DashboardResult;
use crate::loader::load_csv;
use crate::utils::Timer;
use tracing::{info, warn};

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> DashboardResult<SalesDataset> {
        let _t = Timer::start("Sales pipeline");

        // ── 1. Load ───────────────────────────────────────────────────────────
        let path = &self.config.source.path;
        info!("=== Step 1: Loading {:?} ===", path);
        let delimiter = delimiter_byte(self.config.source.delimiter);
        let records = load_csv(path, &self.config.columns, delimiter)?;

        // ── 2. Enrich ─────────────────────────────────────────────────────────
        info!(
            "=== Step 2: Deriving year / month / ISO week ({:?} policy) ===",
            self.config.enrich.policy
        );
        let enrichment = Enricher::new(&self.config.enrich).enrich_all(records)?;
        if !enrichment.skipped.is_empty() {
            warn!("{} rows skipped with unparseable dates", enrichment.skipped.len());
        }

        // ── 3. Aggregate ──────────────────────────────────────────────────────
        info!("=== Step 3: Aggregating {} records ===", enrichment.records.len());
        let dataset = SalesDataset::with_skipped(enrichment.records, enrichment.skipped);

        let stats = dataset.stats();
        info!(
            "=== Done: {} records | {} weeks | {} items | range: {:?} → {:?} ===",
            stats.records, stats.weeks, stats.total_items, stats.first_date, stats.last_date,
        );

        Ok(dataset)
    }
}

/// CSV delimiters must be a single ASCII byte; anything else falls back to ','.
fn delimiter_byte(c: char) -> u8 {
    if c.is_ascii() {
        c as u8
    } else {
        warn!("Delimiter {:?} is not ASCII, falling back to ','", c);
        b','
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
