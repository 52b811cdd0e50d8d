// src/report/mod.rs
use std::io::{self, Write};

use crate::analyze::{PublisherAnalysis, YearlyAggregate};

const HEADERS: [&str; 3] = ["year", "na_total", "global_total"];

/// Render the analysis results to `out`: the best publisher, the
/// missing-data count, and the yearly sales table.
pub fn render_analysis(analysis: &PublisherAnalysis, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "The publisher with the highest total video game sales in North America is: '{}'",
        analysis.best_publisher
    )?;
    writeln!(
        out,
        "The number of titles with missing sales data for North America: {}",
        analysis.missing_count
    )?;
    writeln!(out, "Sales data for the publisher:")?;
    render_table(&analysis.yearly_sales, out)
}

fn cell(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "null".to_string(),
    }
}

/// Aligned ASCII table of yearly aggregates, right-justified values.
fn render_table(rows: &[YearlyAggregate], out: &mut impl Write) -> io::Result<()> {
    let rendered: Vec<[String; 3]> = rows
        .iter()
        .map(|r| [r.year.to_string(), cell(r.na_total), cell(r.global_total)])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rendered {
        for (w, v) in widths.iter_mut().zip(row) {
            *w = (*w).max(v.len());
        }
    }

    let rule: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(*w)))
        .chain(std::iter::once("+".to_string()))
        .collect();

    writeln!(out, "{rule}")?;
    for (&w, h) in widths.iter().zip(HEADERS) {
        write!(out, "|{h:>w$}")?;
    }
    writeln!(out, "|")?;
    writeln!(out, "{rule}")?;
    for row in &rendered {
        for (&w, v) in widths.iter().zip(row) {
            write!(out, "|{v:>w$}")?;
        }
        writeln!(out, "|")?;
    }
    writeln!(out, "{rule}")
}
