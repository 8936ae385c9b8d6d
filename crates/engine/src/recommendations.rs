//! Similarity-weighted rating predictions.
//!
//! ## Algorithm
//! 1. Rank the other raters by similarity to the target rater
//! 2. Keep the `num_similar_raters` most similar ones
//! 3. For each movie passing the filter, combine the ratings those raters
//!    gave it: sum of (similarity x rating) divided by sum of |similarity|
//! 4. Report movies rated by at least `min_raters` of them, best first
//!
//! The numerator uses the signed similarity and the denominator its absolute
//! value. Only positive similarities survive step 1, so the two agree in
//! practice; the asymmetry is kept as is.

use crate::engine::RecommendationEngine;
use crate::types::{rank, ItemScore, SortOrder};
use data_loader::Rater;
use filters::{Filter, TrueFilter};
use tracing::{debug, instrument};

/// Running totals for one candidate movie.
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    weighted_sum: f64,
    weight_total: f64,
    contributors: usize,
}

impl Accumulator {
    fn add(&mut self, weight: f64, rating: f64) {
        self.weighted_sum += weight * rating;
        self.weight_total += weight.abs();
        self.contributors += 1;
    }

    fn prediction(&self, min_raters: usize) -> Option<f64> {
        (self.contributors >= min_raters && self.weight_total > 0.0)
            .then(|| self.weighted_sum / self.weight_total)
    }
}

impl RecommendationEngine {
    /// Predicted scores over every movie, best first.
    pub fn recommendations(
        &self,
        rater_id: &str,
        num_similar_raters: usize,
        min_raters: usize,
    ) -> Vec<ItemScore> {
        self.recommendations_by_filter(
            rater_id,
            num_similar_raters,
            min_raters,
            &Filter::True(TrueFilter),
        )
    }

    /// Predicted scores for the movies passing `filter`, best first.
    ///
    /// # Arguments
    /// * `rater_id` - The rater to predict for; unknown ids give an empty list
    /// * `num_similar_raters` - How many of the most similar raters to consult
    /// * `min_raters` - Minimum number of consulted raters who rated a movie
    /// * `filter` - Which movies are candidates
    ///
    /// Movies the target rater already rated are not excluded here; callers
    /// that only want unseen movies drop them afterwards.
    #[instrument(skip(self, filter), fields(filter = %filter))]
    pub fn recommendations_by_filter(
        &self,
        rater_id: &str,
        num_similar_raters: usize,
        min_raters: usize,
        filter: &Filter,
    ) -> Vec<ItemScore> {
        let mut similar = self.similar_raters(rater_id);
        similar.truncate(num_similar_raters);
        if similar.is_empty() {
            debug!("No similar raters for {}, nothing to recommend", rater_id);
            return Vec::new();
        }

        let raters = &self.data_index.raters;
        let neighbours: Vec<(&Rater, f64)> = similar
            .iter()
            .filter_map(|s| raters.get(&s.rater_id).map(|r| (r, s.weight)))
            .collect();

        let movies = &self.data_index.movies;
        let mut predictions: Vec<ItemScore> = movies
            .filter_by(|id| filter.satisfies(movies, id))
            .into_iter()
            .filter_map(|movie_id| {
                let mut acc = Accumulator::default();
                for &(neighbour, weight) in &neighbours {
                    if let Some(rating) = neighbour.rating(&movie_id) {
                        acc.add(weight, rating);
                    }
                }
                let score = acc.prediction(min_raters)?;
                Some(ItemScore::new(movie_id, score))
            })
            .collect();

        rank(&mut predictions, SortOrder::Descending);
        debug!(
            "Predicted {} movies from {} similar raters",
            predictions.len(),
            neighbours.len()
        );
        predictions
    }
}
