//! Conjunction of filters.
//!
//! `AllFilters` chains several filters with logical AND using the builder
//! pattern. It owns its child filters and nothing else.

use crate::filter::Filter;
use data_loader::MovieDatabase;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Passes a movie only if every child filter passes it.
///
/// ## Usage
/// ```ignore
/// let filter = AllFilters::new()
///     .add_filter(YearAfterFilter::new(1990))
///     .add_filter(GenreFilter::new("Drama"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllFilters {
    filters: Vec<Filter>,
}

impl AllFilters {
    /// Create a new empty conjunction, which accepts every movie.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the conjunction (builder pattern).
    pub fn add_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Add a filter in place.
    pub fn push(&mut self, filter: impl Into<Filter>) {
        self.filters.push(filter.into());
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check filters in insertion order, stopping at the first rejection.
    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        for filter in &self.filters {
            if !filter.satisfies(movies, movie_id) {
                trace!("{} rejected movie {}", filter.name(), movie_id);
                return false;
            }
        }
        true
    }
}
