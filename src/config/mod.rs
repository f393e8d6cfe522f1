use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the sales table lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

/// Header names of the required columns
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnConfig {
    #[serde(default = "default_date_column")]
    pub date: String,

    #[serde(default = "default_quantity_column")]
    pub quantity: String,

    #[serde(default = "default_category_column")]
    pub category: String,

    #[serde(default = "default_product_type_column")]
    pub product_type: String,
}

/// Date parsing behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichConfig {
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    #[serde(default)]
    pub policy: ParsePolicy,
}

/// What to do with a row whose date cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Abort the whole load.
    #[default]
    Strict,
    /// Skip the row and keep going.
    Lenient,
}

/// Chart payload settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub series_year: SeriesYear,
}

/// Which year splits the weekly line chart into series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesYear {
    #[default]
    Calendar,
    Iso,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_source_path() -> PathBuf {
    PathBuf::from("db/Voga_ventas.csv")
}
fn default_delimiter() -> char {
    ','
}
fn default_date_column() -> String {
    "fecha_movimiento".to_string()
}
fn default_quantity_column() -> String {
    "count_items".to_string()
}
fn default_category_column() -> String {
    "CATEGORY".to_string()
}
fn default_product_type_column() -> String {
    "tipo".to_string()
}
fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y",
        "%m/%d/%Y %H:%M",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}
fn default_title() -> String {
    "Dashboard de Ventas de Joyería".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date: default_date_column(),
            quantity: default_quantity_column(),
            category: default_category_column(),
            product_type: default_product_type_column(),
        }
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            date_formats: default_date_formats(),
            policy: ParsePolicy::Strict,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            series_year: SeriesYear::Calendar,
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("SALES").separator("__"))
            .build()?;

        Self::from_config(cfg)
    }

    /// Deserialize a built configuration. A bad value anywhere is an error
    /// rather than a silent fallback to defaults.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        cfg.try_deserialize().context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_csv_headers() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.columns.date, "fecha_movimiento");
        assert_eq!(cfg.columns.quantity, "count_items");
        assert_eq!(cfg.columns.category, "CATEGORY");
        assert_eq!(cfg.columns.product_type, "tipo");
        assert_eq!(cfg.enrich.policy, ParsePolicy::Strict);
        assert_eq!(cfg.source.delimiter, ',');
    }

    fn from_toml(toml: &str) -> Result<AppConfig> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        AppConfig::from_config(cfg)
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = from_toml("[enrich]\npolicy = \"lenient\"\n[columns]\ncategory = \"cat\"\n").unwrap();

        assert_eq!(cfg.enrich.policy, ParsePolicy::Lenient);
        assert_eq!(cfg.columns.category, "cat");
        assert_eq!(cfg.columns.date, "fecha_movimiento");
        assert!(!cfg.enrich.date_formats.is_empty());
        assert_eq!(cfg.dashboard.series_year, SeriesYear::Calendar);
    }

    #[test]
    fn bad_value_is_an_error_not_defaults() {
        let err = from_toml("[source]\npath = \"other.csv\"\n[enrich]\npolicy = \"lenent\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid configuration"));

        let cfg = from_toml("[source]\npath = \"other.csv\"\n").unwrap();
        assert_eq!(cfg.source.path, PathBuf::from("other.csv"));
    }
}
