//! Chart payload handed to the presentation layer.
//!
//! Three figures, shaped after the dashboard page:
//!   * line — items per ISO week, one series per year
//!   * pie  — row count per category
//!   * bar  — items per product type
//!
//! Nothing here renders; the payload is plain data serialised to JSON.

use crate::config::{DashboardConfig, SeriesYear};
use crate::dataset::SalesDataset;
use serde::Serialize;
use std::collections::BTreeMap;

const ITEMS_LABEL: &str = "Cantidad de Ítems";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardCharts {
    pub title: String,
    pub line: LineChart,
    pub pie: PieChart,
    pub bar: BarChart,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineChart {
    pub heading: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Point {
    pub x: u32,
    pub y: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieChart {
    pub heading: String,
    pub title: String,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarChart {
    pub heading: String,
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Slice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: u64,
}

impl DashboardCharts {
    pub fn build(dataset: &SalesDataset, config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            line: line_chart(dataset, config.series_year),
            pie: pie_chart(dataset),
            bar: bar_chart(dataset),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Points keep the aggregate order, so within a series weeks appear in
/// (month, week) order.
fn line_chart(dataset: &SalesDataset, split: SeriesYear) -> LineChart {
    let mut by_year: BTreeMap<i32, Vec<Point>> = BTreeMap::new();
    for row in dataset.time_series() {
        let year = match split {
            SeriesYear::Calendar => row.key.year,
            SeriesYear::Iso => row.key.iso_year(),
        };
        by_year.entry(year).or_default().push(Point {
            x: row.key.week,
            y: row.total,
        });
    }

    LineChart {
        heading: "Línea de Tiempo de Ventas (por Año, Mes y Semana)".to_string(),
        title: "Ventas por Semana".to_string(),
        x_label: "Semana".to_string(),
        y_label: ITEMS_LABEL.to_string(),
        series: by_year
            .into_iter()
            .map(|(year, points)| Series {
                name: year.to_string(),
                points,
            })
            .collect(),
    }
}

fn pie_chart(dataset: &SalesDataset) -> PieChart {
    PieChart {
        heading: "Distribución por Categoría".to_string(),
        title: "Distribución por Categoría".to_string(),
        slices: dataset
            .category_counts()
            .into_iter()
            .map(|c| Slice {
                label: c.category,
                value: c.rows as u64,
            })
            .collect(),
    }
}

fn bar_chart(dataset: &SalesDataset) -> BarChart {
    BarChart {
        heading: "Ventas por Tipo de Producto".to_string(),
        title: "Ventas por Tipo de Producto".to_string(),
        y_label: ITEMS_LABEL.to_string(),
        bars: dataset
            .product_type_totals()
            .into_iter()
            .map(|t| Slice {
                label: t.product_type,
                value: t.total,
            })
            .collect(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::enrich_with_date;
    use crate::models::SalesRecord;
    use chrono::NaiveDate;

    fn dataset() -> SalesDataset {
        let rows = [
            ((2024, 6, 3), 4, "ANILLOS", "ORO"),
            ((2024, 12, 30), 2, "ARETES", "PLATA"),
            ((2025, 1, 7), 3, "ANILLOS", "ORO"),
        ];
        SalesDataset::new(
            rows.iter()
                .map(|&((y, m, d), count, category, product_type)| {
                    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
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
                })
                .collect(),
        )
    }

    #[test]
    fn test_calendar_series() {
        let charts = DashboardCharts::build(&dataset(), &DashboardConfig::default());
        let series: Vec<(&str, Vec<(u32, u64)>)> = charts
            .line
            .series
            .iter()
            .map(|s| (s.name.as_str(), s.points.iter().map(|p| (p.x, p.y)).collect()))
            .collect();
        assert_eq!(
            series,
            vec![("2024", vec![(23, 4), (1, 2)]), ("2025", vec![(2, 3)])]
        );
        assert_eq!(charts.title, "Dashboard de Ventas de Joyería");
    }

    #[test]
    fn test_iso_series() {
        let config = DashboardConfig {
            series_year: SeriesYear::Iso,
            ..DashboardConfig::default()
        };
        let charts = DashboardCharts::build(&dataset(), &config);
        let names: Vec<(&str, usize)> = charts
            .line
            .series
            .iter()
            .map(|s| (s.name.as_str(), s.points.len()))
            .collect();
        assert_eq!(names, vec![("2024", 1), ("2025", 2)]);
    }

    #[test]
    fn test_pie_and_bar() {
        let charts = DashboardCharts::build(&dataset(), &DashboardConfig::default());
        assert_eq!(
            charts.pie.slices,
            vec![
                Slice { label: "ANILLOS".into(), value: 2 },
                Slice { label: "ARETES".into(), value: 1 },
            ]
        );
        assert_eq!(
            charts.bar.bars,
            vec![
                Slice { label: "ORO".into(), value: 7 },
                Slice { label: "PLATA".into(), value: 2 },
            ]
        );
    }

    #[test]
    fn test_json_payload() {
        let json = DashboardCharts::build(&dataset(), &DashboardConfig::default())
            .to_json(false)
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["line"]["x_label"], "Semana");
        assert_eq!(v["bar"]["y_label"], "Cantidad de Ítems");
        assert_eq!(v["pie"]["slices"][0]["label"], "ANILLOS");
        assert_eq!(v["line"]["series"][0]["points"][0]["y"], 4);
    }
}
