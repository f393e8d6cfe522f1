mod aggregator;
mod charts;
mod config;
mod dataset;
mod enricher;
mod error;
mod loader;
mod models;
mod pipeline;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::charts::DashboardCharts;
use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::utils::{fit, fmt_count};

#[derive(Parser)]
#[command(name = "sales-dashboard", about = "Sales dashboard data core", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Sales CSV to read (overrides `source.path`)
    #[arg(short, long, env = "SALES_CSV", global = true)]
    file: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Weekly item totals by (year, month, ISO week)
    Summary,

    /// Row count per category (pie chart data)
    Categories,

    /// Items sold per product type (bar chart data)
    ProductTypes,

    /// Emit the three charts as a JSON payload
    Charts {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show dataset statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "sales_dashboard=info,warn",
        1 => "sales_dashboard=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;
    if let Some(file) = cli.file {
        config.source.path = file;
    }

    let source = config.source.path.clone();
    let dashboard = config.dashboard.clone();
    let dataset = Pipeline::new(config)
        .run()
        .with_context(|| format!("Failed to build sales dataset from {:?}", source))?;

    match cli.command {
        Command::Summary => {
            let rows = dataset.time_series();
            if rows.is_empty() {
                println!("No sales rows in {:?}.", source);
                return Ok(());
            }
            println!("  Año   Mes  Semana      Ítems");
            println!("─────────────────────────────────");
            for r in rows {
                println!(
                    "  {:<5} {:>3}  {:>6}  {:>9}",
                    r.key.year,
                    r.key.month,
                    r.key.week,
                    fmt_count(r.total)
                );
            }
            println!("─────────────────────────────────");
            println!("  Total              {:>9}", fmt_count(dataset.total_items()));
        }

        Command::Categories => {
            let counts = dataset.category_counts();
            println!("{} categories:", counts.len());
            for c in &counts {
                println!("  {} {:>9}", fit(&c.category, 24), fmt_count(c.rows as u64));
            }
        }

        Command::ProductTypes => {
            let totals = dataset.product_type_totals();
            println!("{} product types:", totals.len());
            for t in &totals {
                println!("  {} {:>9}", fit(&t.product_type, 24), fmt_count(t.total));
            }
        }

        Command::Charts { out, compact } => {
            let json = DashboardCharts::build(&dataset, &dashboard)
                .to_json(!compact)
                .context("Failed to serialise chart payload")?;

            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Could not write {:?}", path))?;
                    info!("Chart payload written to {:?}", path);
                }
                None => println!("{}", json),
            }
        }

        Command::Stats => {
            let stats = dataset.stats();
            println!("─────────────────────────────────");
            println!("  {}", dashboard.title);
            println!("─────────────────────────────────");
            println!("  Records       : {}", fmt_count(stats.records as u64));
            println!("  Skipped       : {}", fmt_count(stats.skipped as u64));
            println!("  Items         : {}", fmt_count(stats.total_items));
            println!("  Weeks         : {}", fmt_count(stats.weeks as u64));
            println!("  Years         : {:?}", dataset.years());
            println!("  Categories    : {}", stats.categories);
            println!("  Product types : {}", stats.product_types);
            println!("  From          : {}", stats.first_date.map(|d| d.to_string()).unwrap_or("—".into()));
            println!("  To            : {}", stats.last_date.map(|d| d.to_string()).unwrap_or("—".into()));
            println!("─────────────────────────────────");
            for e in dataset.skipped() {
                println!("  skipped: {}", e);
            }
        }
    }

    Ok(())
}
