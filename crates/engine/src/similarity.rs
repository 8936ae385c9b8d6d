//! Rater-to-rater similarity.
//!
//! ## Algorithm
//! Ratings are centered on the scale midpoint (5.0) so that two raters who
//! both liked, or both disliked, a movie push the score up. Similarity is the
//! dot product of the centered ratings over the movies both raters rated.
//! It is not normalized: raters with more movies in common can reach larger
//! values.

use crate::engine::RecommendationEngine;
use crate::types::{rank, RaterSimilarity, SortOrder};
use data_loader::{Rater, RATING_MIDPOINT};
use tracing::{debug, instrument};

/// Centered dot product of two raters over the movies both rated.
///
/// Returns 0.0 when they have no movie in common. The result does not depend
/// on argument order.
pub fn similarity(a: &Rater, b: &Rater) -> f64 {
    // Walk the shorter vector; both iterate in ascending movie id order, so
    // the terms are summed in the same order either way.
    let (short, long) = if a.num_ratings() <= b.num_ratings() {
        (a, b)
    } else {
        (b, a)
    };

    short
        .ratings()
        .filter_map(|(movie_id, rating)| {
            let other = long.rating(movie_id)?;
            Some((rating - RATING_MIDPOINT) * (other - RATING_MIDPOINT))
        })
        .sum()
}

impl RecommendationEngine {
    /// Similarity between two raters by id; 0.0 if either is unknown.
    pub fn similarity_between(&self, rater_a: &str, rater_b: &str) -> f64 {
        let raters = &self.data_index.raters;
        match (raters.get(rater_a), raters.get(rater_b)) {
            (Some(a), Some(b)) => similarity(a, b),
            _ => 0.0,
        }
    }

    /// Every other rater with a positive similarity to `rater_id`, most
    /// similar first.
    ///
    /// An unknown `rater_id` yields an empty list. Equal weights keep
    /// ascending rater id order.
    #[instrument(skip(self))]
    pub fn similar_raters(&self, rater_id: &str) -> Vec<RaterSimilarity> {
        let raters = &self.data_index.raters;
        let Some(me) = raters.get(rater_id) else {
            debug!("Rater {} not found", rater_id);
            return Vec::new();
        };

        let mut similar: Vec<RaterSimilarity> = raters
            .raters()
            .filter(|other| other.id != me.id)
            .filter_map(|other| {
                let weight = similarity(me, other);
                (weight > 0.0).then(|| RaterSimilarity::new(other.id.clone(), weight))
            })
            .collect();

        rank(&mut similar, SortOrder::Descending);
        debug!("Found {} similar raters", similar.len());
        similar
    }
}
