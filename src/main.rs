use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vgsales::{analyze, load, report};

const DEFAULT_SALES_FILE: &str = "data/video_game_sales.csv";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) resolve input path ───────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SALES_FILE.to_string());
    info!(path = %path, "analyzing sales file");

    // ─── 3) load + analyze ───────────────────────────────────────────
    let start = Instant::now();
    let table = load::load_sales_table(&path).context("loading sales table")?;
    info!(rows = table.num_rows(), elapsed = ?start.elapsed(), "load complete");

    let start = Instant::now();
    let analysis =
        analyze::analyze_publisher_sales(&table).context("analyzing publisher sales")?;
    info!(elapsed = ?start.elapsed(), "analysis complete");

    // ─── 4) report ───────────────────────────────────────────────────
    report::render_analysis(&analysis, &mut io::stdout().lock()).context("writing report")?;

    Ok(())
}
