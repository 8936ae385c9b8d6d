//! Filter on release year.

use data_loader::MovieDatabase;
use serde::{Deserialize, Serialize};

/// Keeps movies released in `year` or later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAfterFilter {
    pub year: i32,
}

impl YearAfterFilter {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        movies.year(movie_id) >= self.year
    }
}
