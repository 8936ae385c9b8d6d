//! Filter on running time.

use data_loader::MovieDatabase;
use serde::{Deserialize, Serialize};

/// Keeps movies whose runtime lies within `min..=max` minutes.
///
/// Movies with an unknown runtime are stored as 0 minutes, so they fail any
/// range with a positive minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutesFilter {
    pub min: u32,
    pub max: u32,
}

impl MinutesFilter {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        let minutes = movies.minutes(movie_id);
        minutes >= self.min && minutes <= self.max
    }
}
