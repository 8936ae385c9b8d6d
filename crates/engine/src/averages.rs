//! Average ratings per movie.
//!
//! ## Algorithm
//! For a movie, scan every rater, sum the ratings given to it and count the
//! raters. The mean is reported only when enough raters contributed.

use crate::engine::RecommendationEngine;
use crate::types::{rank, ItemScore, SortOrder};
use filters::{Filter, TrueFilter};
use tracing::{debug, instrument};

/// Whether a qualifying average is listed by `average_ratings*`.
///
/// Only positive averages are listed. On the 0-10 scale this drops a movie
/// only when every rating it received is 0.
pub fn keep_average(average: f64) -> bool {
    average > 0.0
}

impl RecommendationEngine {
    /// Mean rating of `movie_id` over all raters who rated it.
    ///
    /// Returns `None` if fewer than `min_raters` raters rated the movie, or
    /// if nobody rated it at all.
    pub fn average_rating(&self, movie_id: &str, min_raters: usize) -> Option<f64> {
        let (count, total) = self
            .data_index
            .raters
            .raters()
            .filter_map(|rater| rater.rating(movie_id))
            .fold((0usize, 0.0f64), |(count, total), rating| {
                (count + 1, total + rating)
            });

        if count == 0 || count < min_raters {
            return None;
        }
        Some(total / count as f64)
    }

    /// Averages of every movie with at least `min_raters` ratings, lowest first.
    pub fn average_ratings(&self, min_raters: usize) -> Vec<ItemScore> {
        self.average_ratings_by_filter(min_raters, &Filter::True(TrueFilter))
    }

    /// Averages of the movies passing `filter`, lowest first.
    ///
    /// Movies whose average is not positive are left out (see
    /// [`keep_average`]). Equal averages keep ascending movie id order.
    #[instrument(skip(self, filter), fields(filter = %filter))]
    pub fn average_ratings_by_filter(&self, min_raters: usize, filter: &Filter) -> Vec<ItemScore> {
        let movies = &self.data_index.movies;

        let mut averages: Vec<ItemScore> = movies
            .filter_by(|id| filter.satisfies(movies, id))
            .into_iter()
            .filter_map(|movie_id| {
                let average = self.average_rating(&movie_id, min_raters)?;
                keep_average(average).then(|| ItemScore::new(movie_id, average))
            })
            .collect();

        rank(&mut averages, SortOrder::Ascending);
        debug!("Computed {} qualifying averages", averages.len());
        averages
    }
}
