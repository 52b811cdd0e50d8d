// src/analyze/mod.rs
use std::collections::{BTreeMap, HashMap};

use arrow::{
    array::{Array, Date32Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::schema::{days_to_year, ANALYSIS_END_YEAR, ANALYSIS_START_YEAR};

/// Per-year totals for one publisher. A `None` total means every
/// contributing cell that year was null, matching null-skipping sums.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub year: i32,
    pub na_total: Option<f64>,
    pub global_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublisherAnalysis {
    /// Publisher with the highest summed NA sales inside the window.
    pub best_publisher: String,
    /// That publisher's yearly NA/global totals, ascending by year.
    pub yearly_sales: Vec<YearlyAggregate>,
    /// Rows for that publisher inside the window with null na_sales.
    pub missing_count: usize,
}

/// Null-skipping f64 accumulator: stays `None` until a non-null value lands.
#[derive(Default, Clone, Copy)]
struct NullableSum(Option<f64>);

impl NullableSum {
    fn add(&mut self, v: Option<f64>) {
        if let Some(v) = v {
            self.0 = Some(self.0.unwrap_or(0.0) + v);
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

struct SalesColumns<'a> {
    publisher: &'a StringArray,
    release_date: &'a Date32Array,
    na_sales: &'a Float64Array,
    total_sales: &'a Float64Array,
}

impl<'a> SalesColumns<'a> {
    fn from_batch(batch: &'a RecordBatch) -> Result<Self, AnalysisError> {
        Ok(Self {
            publisher: typed_column(batch, "publisher")?,
            release_date: typed_column(batch, "release_date")?,
            na_sales: typed_column(batch, "na_sales")?,
            total_sales: typed_column(batch, "total_sales")?,
        })
    }

    /// Release year of row `i`, if the date is present and in the window.
    fn window_year(&self, i: usize) -> Option<i32> {
        if self.release_date.is_null(i) {
            return None;
        }
        let year = days_to_year(self.release_date.value(i))?;
        (ANALYSIS_START_YEAR..=ANALYSIS_END_YEAR)
            .contains(&year)
            .then_some(year)
    }

    fn opt_f64(arr: &Float64Array, i: usize) -> Option<f64> {
        (!arr.is_null(i)).then(|| arr.value(i))
    }
}

fn typed_column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, AnalysisError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| {
            arrow::error::ArrowError::SchemaError(format!("missing or mistyped column {name}"))
                .into()
        })
}

/// Find the best NA publisher for releases in the analysis window and that
/// publisher's yearly sales trend.
///
/// Two passes over the projected table: one to total NA sales per
/// publisher, one restricted to the winning publisher for the yearly
/// aggregates and the missing-data count.
pub fn analyze_publisher_sales(batch: &RecordBatch) -> Result<PublisherAnalysis, AnalysisError> {
    let cols = SalesColumns::from_batch(batch)?;
    let best_publisher = best_na_publisher(&cols)?;
    info!(publisher = %best_publisher, "best NA publisher in window");

    let mut missing_count = 0usize;
    let mut by_year: BTreeMap<i32, (NullableSum, NullableSum)> = BTreeMap::new();

    for i in 0..batch.num_rows() {
        let Some(year) = cols.window_year(i) else {
            continue;
        };
        if cols.publisher.is_null(i) || cols.publisher.value(i) != best_publisher {
            continue;
        }

        let na = SalesColumns::opt_f64(cols.na_sales, i);
        if na.is_none() {
            missing_count += 1;
        }
        let (na_sum, global_sum) = by_year.entry(year).or_default();
        na_sum.add(na);
        global_sum.add(SalesColumns::opt_f64(cols.total_sales, i));
    }

    let yearly_sales = by_year
        .into_iter()
        .map(|(year, (na, global))| YearlyAggregate {
            year,
            na_total: na.0.map(round2),
            global_total: global.0.map(round2),
        })
        .collect();

    Ok(PublisherAnalysis {
        best_publisher,
        yearly_sales,
        missing_count,
    })
}

/// Total NA sales per publisher over the window, then pick the maximum.
/// Ties break on ascending publisher name so the result is deterministic.
fn best_na_publisher(cols: &SalesColumns<'_>) -> Result<String, AnalysisError> {
    let mut totals: HashMap<&str, NullableSum> = HashMap::new();

    for i in 0..cols.publisher.len() {
        if cols.window_year(i).is_none() || cols.publisher.is_null(i) {
            continue;
        }
        totals
            .entry(cols.publisher.value(i))
            .or_default()
            .add(SalesColumns::opt_f64(cols.na_sales, i));
    }
    debug!(publishers = totals.len(), "publisher totals in window");

    let mut best: Option<(&str, f64)> = None;
    for (&publisher, sum) in &totals {
        // publishers whose NA sales are all null never contend
        let Some(total) = sum.0 else { continue };
        best = match best {
            Some((bp, bt)) if total < bt || (total == bt && publisher >= bp) => Some((bp, bt)),
            _ => Some((publisher, total)),
        };
    }

    best.map(|(p, _)| p.to_string())
        .ok_or(AnalysisError::EmptyWindow)
}
