//! Filter on genre.

use data_loader::MovieDatabase;
use serde::{Deserialize, Serialize};

/// Keeps movies that list `genre` among their genres.
///
/// Genre names are compared whole and ASCII case-insensitively, so "Drama"
/// does not match "Docudrama".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreFilter {
    pub genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into().trim().to_string(),
        }
    }

    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        movies
            .get(movie_id)
            .is_some_and(|movie| movie.genre_list().any(|g| g.eq_ignore_ascii_case(&self.genre)))
    }
}
