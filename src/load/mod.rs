// src/load/mod.rs
use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder, StringArray, StringBuilder},
    csv::ReaderBuilder,
    record_batch::RecordBatch,
};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::schema::{date_to_days, parse_release_date, projected_schema, raw_schema};

const READ_BATCH_SIZE: usize = 8192;

/// Trim whitespace; empty cells become None. Quote handling belongs to the
/// csv reader, so no unquoting happens here.
fn clean_cell(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Load the pipe-delimited sales file and project it to the four columns
/// the analysis needs: publisher, release_date, na_sales, total_sales.
///
/// Every cell is read as a string first; coercion to date/float happens
/// here, and a cell that fails to coerce becomes null rather than aborting
/// the load.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_sales_table<P: AsRef<Path>>(path: P) -> Result<RecordBatch, AnalysisError> {
    let file = File::open(&path).map_err(|source| AnalysisError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let reader = ReaderBuilder::new(Arc::new(raw_schema()))
        .with_header(true)
        .with_delimiter(b'|')
        .with_quote(b'"')
        .with_batch_size(READ_BATCH_SIZE)
        // short rows pad with nulls; rows with extra fields still abort the
        // load as a structural Read error, since a field-count overflow means
        // the file is not the declared 12-column layout at all
        .with_truncated_rows(true)
        .build(BufReader::new(file))?;

    let mut projected = Vec::new();
    for batch in reader {
        let batch = batch?;
        debug!(rows = batch.num_rows(), "read raw batch");
        projected.push(project_batch(&batch)?);
    }

    let schema = Arc::new(projected_schema());
    let table = if projected.is_empty() {
        RecordBatch::new_empty(schema)
    } else {
        arrow::compute::concat_batches(&schema, &projected)?
    };

    info!(rows = table.num_rows(), "loaded sales table");
    Ok(table)
}

/// Convert one all-Utf8 batch into the typed projected columns.
fn project_batch(batch: &RecordBatch) -> Result<RecordBatch, AnalysisError> {
    let publisher = utf8_column(batch, "publisher")?;
    let release_date = utf8_column(batch, "release_date")?;
    let na_sales = utf8_column(batch, "na_sales")?;
    let total_sales = utf8_column(batch, "total_sales")?;

    let mut publisher_b = StringBuilder::new();
    for opt in publisher.iter() {
        publisher_b.append_option(opt.and_then(clean_cell));
    }

    let mut date_b = Date32Builder::new();
    for opt in release_date.iter() {
        let days = opt
            .and_then(clean_cell)
            .and_then(parse_release_date)
            .map(date_to_days);
        date_b.append_option(days);
    }

    let mut na_b = Float64Builder::new();
    for opt in na_sales.iter() {
        na_b.append_option(opt.and_then(clean_cell).and_then(|s| s.parse().ok()));
    }

    let mut total_b = Float64Builder::new();
    for opt in total_sales.iter() {
        total_b.append_option(opt.and_then(clean_cell).and_then(|s| s.parse().ok()));
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(publisher_b.finish()),
        Arc::new(date_b.finish()),
        Arc::new(na_b.finish()),
        Arc::new(total_b.finish()),
    ];
    RecordBatch::try_new(Arc::new(projected_schema()), columns).map_err(Into::into)
}

fn utf8_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, AnalysisError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| arrow::error::ArrowError::SchemaError(format!("missing column {name}")))?;
    col.as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            arrow::error::ArrowError::SchemaError(format!("column {name} is not Utf8")).into()
        })
}
