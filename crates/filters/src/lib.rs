//! Movie filters for the recommendation engine.
//!
//! This crate provides:
//! - `Filter`, a closed enum of movie predicates
//! - One struct per variant: `TrueFilter`, `MinutesFilter`,
//!   `YearAfterFilter`, `GenreFilter`, `DirectorsFilter`
//! - `AllFilters` for composing filters with logical AND
//!
//! ## Example Usage
//! ```ignore
//! use filters::{AllFilters, Filter, MinutesFilter, YearAfterFilter};
//!
//! let filter: Filter = AllFilters::new()
//!     .add_filter(MinutesFilter::new(90, 180))
//!     .add_filter(YearAfterFilter::new(1975))
//!     .into();
//!
//! let candidates = index.movies.filter_by(|id| filter.satisfies(&index.movies, id));
//! ```

pub mod all_filters;
pub mod directors;
pub mod filter;
pub mod genre;
pub mod minutes;
pub mod year_after;

// Re-export main types
pub use all_filters::AllFilters;
pub use directors::DirectorsFilter;
pub use filter::{Filter, TrueFilter};
pub use genre::GenreFilter;
pub use minutes::MinutesFilter;
pub use year_after::YearAfterFilter;
