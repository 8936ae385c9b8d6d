//! Filter on director.

use data_loader::MovieDatabase;
use data_loader::types::split_names;
use serde::{Deserialize, Serialize};

/// Keeps movies directed (or co-directed) by any of the listed directors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorsFilter {
    pub directors: Vec<String>,
}

impl DirectorsFilter {
    /// Build from a comma-separated list, e.g. "Charles Chaplin,Michael Mann".
    pub fn new(directors: &str) -> Self {
        Self {
            directors: split_names(directors).map(str::to_string).collect(),
        }
    }

    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        movies.get(movie_id).is_some_and(|movie| {
            movie
                .directors()
                .any(|d| self.directors.iter().any(|wanted| wanted == d))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;

    #[test]
    fn test_directors_filter() {
        let movies: MovieDatabase = [
            ("1", "Charles Chaplin"),
            ("2", "Joel Coen, Ethan Coen"),
            ("3", "Michael Mann"),
        ]
        .into_iter()
        .map(|(id, director)| {
            let mut movie = Movie::new(id, id);
            movie.director = director.to_string();
            movie
        })
        .collect();

        let filter = DirectorsFilter::new("Charles Chaplin, Ethan Coen");
        assert_eq!(filter.directors.len(), 2);
        assert!(filter.satisfies(&movies, "1"));
        assert!(filter.satisfies(&movies, "2"));
        assert!(!filter.satisfies(&movies, "3"));
    }
}
