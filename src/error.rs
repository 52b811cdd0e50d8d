// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::{ANALYSIS_END_YEAR, ANALYSIS_START_YEAR};

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The sales file could not be opened or read.
    #[error("failed to read sales file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited read itself failed (not a cell-level coercion, which
    /// nulls the cell instead).
    #[error("failed to read sales data: {0}")]
    Read(#[from] arrow::error::ArrowError),

    /// No row carries a release year inside the analysis window, so no
    /// best publisher exists.
    #[error("no sales rows released between {} and {}", ANALYSIS_START_YEAR, ANALYSIS_END_YEAR)]
    EmptyWindow,
}
