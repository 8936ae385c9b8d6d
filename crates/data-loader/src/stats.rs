//! Descriptive statistics over a loaded snapshot.
//!
//! These answer the "what does this dataset look like" questions the CLI's
//! `stats` command prints: genre counts, long movies, prolific directors and
//! raters, and how widely movies are rated.

use crate::types::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Names that share the maximum count, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopCount {
    pub count: usize,
    pub names: Vec<String>,
}

impl TopCount {
    fn from_counts(counts: HashMap<&str, usize>) -> Self {
        let count = counts.values().copied().max().unwrap_or(0);
        let mut names: Vec<String> = counts
            .into_iter()
            .filter(|&(_, c)| c == count && count > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        Self { count, names }
    }
}

impl MovieDatabase {
    /// Number of movies listing `genre` (ASCII case-insensitive).
    pub fn count_in_genre(&self, genre: &str) -> usize {
        self.movies()
            .filter(|m| m.genre_list().any(|g| g.eq_ignore_ascii_case(genre)))
            .count()
    }

    /// Number of movies strictly longer than `minutes`.
    pub fn count_longer_than(&self, minutes: u32) -> usize {
        self.movies().filter(|m| m.minutes > minutes).count()
    }

    /// Director(s) credited on the most movies.
    ///
    /// Co-directed movies count once for each director.
    pub fn top_directors(&self) -> TopCount {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for movie in self.movies() {
            for director in movie.directors() {
                *counts.entry(director).or_insert(0) += 1;
            }
        }
        TopCount::from_counts(counts)
    }

    /// Movies per genre, keyed by genre name as written in the data.
    pub fn genre_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for movie in self.movies() {
            for genre in movie.genre_list() {
                *counts.entry(genre.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl RaterDatabase {
    /// Rater(s) with the most ratings.
    pub fn top_raters(&self) -> TopCount {
        let counts = self
            .raters()
            .map(|r| (r.id.as_str(), r.num_ratings()))
            .collect();
        TopCount::from_counts(counts)
    }

    /// Number of raters who rated `movie_id`.
    pub fn raters_of(&self, movie_id: &str) -> usize {
        self.raters().filter(|r| r.has_rating(movie_id)).count()
    }

    /// Number of distinct movies rated by anyone.
    pub fn distinct_movies_rated(&self) -> usize {
        self.raters()
            .flat_map(|r| r.items_rated())
            .collect::<HashSet<_>>()
            .len()
    }
}
