//! Error types for the data-loader crate.
//!
//! Only failures the loader cannot paper over with a default end up here:
//! unreadable files, broken CSV framing, and ratings files without the
//! columns a rating needs. Bad individual field values are defaulted by the
//! parser instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader could not frame a record
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A column the file cannot be used without is absent from the header
    #[error("Missing column '{column}' in header of {file}")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
