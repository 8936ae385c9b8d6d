//! # Engine Crate
//!
//! User-based collaborative filtering over a `DataIndex` snapshot.
//!
//! ## Components
//!
//! ### Averages
//! Per-movie mean rating, optionally restricted by a `Filter` and by a
//! minimum number of raters.
//!
//! ### Similarity
//! Centered dot product between two raters' rating vectors, and the list of
//! raters most similar to a target rater.
//!
//! ### Recommendations
//! Predicted scores for movies: the similarity-weighted average of the
//! ratings given by the target's most similar raters.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use engine::RecommendationEngine;
//! use filters::{Filter, YearAfterFilter};
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files(movies_path, ratings_path)?);
//! let engine = RecommendationEngine::new(data_index);
//!
//! let similar = engine.similar_raters("65");
//! let filter = Filter::from(YearAfterFilter::new(2000));
//! let recommendations = engine.recommendations_by_filter("65", 20, 5, &filter);
//! ```
//!
//! Every operation is a synchronous read of the snapshot. Unknown raters and
//! movies are not errors: they produce empty lists or `None`.

pub mod averages;
pub mod engine;
pub mod recommendations;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use averages::keep_average;
pub use engine::RecommendationEngine;
pub use similarity::similarity;
pub use types::{rank, ItemScore, RaterSimilarity, Scored, SortOrder};
