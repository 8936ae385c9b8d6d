//! # Data Loader Crate
//!
//! This crate loads the rated-movies dataset into an immutable in-memory
//! snapshot that the recommendation engine reads.
//!
//! ## Main Components
//!
//! - **types**: Movie, Rater, the two lookup tables, and the `DataIndex` snapshot
//! - **parser**: Parse the movie and rating CSV files
//! - **index**: Load and validate a snapshot
//! - **stats**: Descriptive statistics over the tables
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(
//!     Path::new("data/ratedmoviesfull.csv"),
//!     Path::new("data/ratings.csv"),
//! )?;
//!
//! let title = index.movies.title("0068646");
//! let rater = index.raters.get("65").unwrap();
//! println!("{} rated {} movies", rater.id, rater.num_ratings());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod stats;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::ValidationReport;
pub use stats::TopCount;
pub use types::{
    // Type aliases
    MovieId,
    RaterId,
    // Core types
    DataIndex,
    Movie,
    MovieDatabase,
    Rater,
    RaterDatabase,
    // Rating scale
    MAX_RATING,
    MIN_RATING,
    RATING_MIDPOINT,
};
