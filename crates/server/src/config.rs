//! Tuning knobs for serving recommendations.

use filters::{Filter, MinutesFilter};
use serde::{Deserialize, Serialize};

/// Parameters used by [`RecommendationOrchestrator`](crate::RecommendationOrchestrator).
///
/// Defaults:
/// - 20 similar raters, each movie rated by at least 5 of them
/// - when that yields nothing new, retry once with 50 similar raters and 3
/// - at most 15 results
/// - 15 items to rate, drawn from movies running 85 to 180 minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub num_similar_raters: usize,
    pub min_raters: usize,
    pub fallback_similar_raters: usize,
    pub fallback_min_raters: usize,
    pub max_results: usize,
    pub items_to_rate: usize,
    pub items_to_rate_filter: Filter,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            num_similar_raters: 20,
            min_raters: 5,
            fallback_similar_raters: 50,
            fallback_min_raters: 3,
            max_results: 15,
            items_to_rate: 15,
            items_to_rate_filter: MinutesFilter::new(85, 180).into(),
        }
    }
}

impl RecommendationConfig {
    pub fn with_num_similar_raters(mut self, num_similar_raters: usize) -> Self {
        self.num_similar_raters = num_similar_raters;
        self
    }

    pub fn with_min_raters(mut self, min_raters: usize) -> Self {
        self.min_raters = min_raters;
        self
    }

    /// Parameters for the second attempt when the first finds nothing unseen.
    pub fn with_fallback(mut self, num_similar_raters: usize, min_raters: usize) -> Self {
        self.fallback_similar_raters = num_similar_raters;
        self.fallback_min_raters = min_raters;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// How many movies to offer for rating, and which movies qualify.
    pub fn with_items_to_rate(mut self, count: usize, filter: impl Into<Filter>) -> Self {
        self.items_to_rate = count;
        self.items_to_rate_filter = filter.into();
        self
    }
}
