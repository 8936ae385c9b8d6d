//! Result types produced by the engine.
//!
//! Averages and predictions are scores attached to a movie; similarities are
//! weights attached to another rater. They are kept as two types so a rater
//! id can never be looked up in the movie table by mistake.

use data_loader::{MovieId, RaterId};
use serde::{Deserialize, Serialize};

/// A value attached to a movie: its average rating or its predicted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub movie_id: MovieId,
    pub value: f64,
}

impl ItemScore {
    pub fn new(movie_id: impl Into<MovieId>, value: f64) -> Self {
        Self {
            movie_id: movie_id.into(),
            value,
        }
    }
}

/// How similar another rater is to the target rater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaterSimilarity {
    pub rater_id: RaterId,
    pub weight: f64,
}

impl RaterSimilarity {
    pub fn new(rater_id: impl Into<RaterId>, weight: f64) -> Self {
        Self {
            rater_id: rater_id.into(),
            weight,
        }
    }
}

/// Direction of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Lowest value first
    Ascending,
    /// Highest value first
    Descending,
}

/// Anything that can be ranked by a single number.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for ItemScore {
    fn score(&self) -> f64 {
        self.value
    }
}

impl Scored for RaterSimilarity {
    fn score(&self) -> f64 {
        self.weight
    }
}

/// Sort `items` by score in the given direction.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank<T: Scored>(items: &mut [T], order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = a.score().total_cmp(&b.score());
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
