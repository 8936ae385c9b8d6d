//! Core domain types for the rated-movies dataset.
//!
//! This module defines the data structures the loader produces and the
//! recommendation engine reads:
//! - `Movie` rows keyed by their string id
//! - `Rater` rating vectors keyed by rater id
//! - `MovieDatabase` and `RaterDatabase` lookup tables
//! - `DataIndex`, the immutable snapshot holding both tables
//!
//! Both tables are `BTreeMap`s so every enumeration happens in ascending id
//! order. Rankings built on top of them break ties the same way on every run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (an IMDb-style id such as "0068646")
pub type MovieId = String;

/// Unique identifier for a rater
pub type RaterId = String;

/// Lowest value on the rating scale.
pub const MIN_RATING: f64 = 0.0;

/// Highest value on the rating scale.
pub const MAX_RATING: f64 = 10.0;

/// Midpoint of the 0-10 rating scale, subtracted from ratings before raters
/// are compared.
pub const RATING_MIDPOINT: f64 = 5.0;

// =============================================================================
// Movie
// =============================================================================

/// A movie with its descriptive metadata.
///
/// Fields the source file leaves empty or unparseable are stored as their
/// zero value (`0`, `""`, `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Release year, 0 if unknown
    pub year: i32,
    pub country: String,
    /// Comma-separated genre list, e.g. "Crime, Drama"
    pub genres: String,
    /// Comma-separated director names
    pub director: String,
    /// Runtime in minutes, 0 if unknown
    pub minutes: u32,
    /// Poster URL; `None` when the source had nothing or "N/A"
    pub poster: Option<String>,
}

impl Movie {
    /// Create a movie with only an id and title set.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: 0,
            country: String::new(),
            genres: String::new(),
            director: String::new(),
            minutes: 0,
            poster: None,
        }
    }

    /// Individual genre names, trimmed, empties skipped.
    pub fn genre_list(&self) -> impl Iterator<Item = &str> {
        split_names(&self.genres)
    }

    /// Individual director names, trimmed, empties skipped.
    pub fn directors(&self) -> impl Iterator<Item = &str> {
        split_names(&self.director)
    }
}

/// Split a comma-separated name list.
pub fn split_names(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|name| !name.is_empty())
}

// =============================================================================
// Rater
// =============================================================================

/// One rater and their sparse movie -> rating vector.
///
/// At most one rating is kept per movie; adding a second rating for the same
/// movie replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rater {
    pub id: RaterId,
    ratings: BTreeMap<MovieId, f64>,
}

impl Rater {
    pub fn new(id: impl Into<RaterId>) -> Self {
        Self {
            id: id.into(),
            ratings: BTreeMap::new(),
        }
    }

    /// Add or replace the rating for a movie.
    pub fn add_rating(&mut self, movie_id: impl Into<MovieId>, rating: f64) {
        self.ratings.insert(movie_id.into(), rating);
    }

    pub fn has_rating(&self, movie_id: &str) -> bool {
        self.ratings.contains_key(movie_id)
    }

    /// The rating for a movie, or `None` if this rater never rated it.
    pub fn rating(&self, movie_id: &str) -> Option<f64> {
        self.ratings.get(movie_id).copied()
    }

    pub fn num_ratings(&self) -> usize {
        self.ratings.len()
    }

    /// Ids of all rated movies, in ascending id order.
    pub fn items_rated(&self) -> impl Iterator<Item = &MovieId> {
        self.ratings.keys()
    }

    /// (movie id, rating) pairs in ascending id order.
    pub fn ratings(&self) -> impl Iterator<Item = (&MovieId, f64)> {
        self.ratings.iter().map(|(id, &rating)| (id, rating))
    }
}

// =============================================================================
// MovieDatabase
// =============================================================================

/// Read-only movie table.
///
/// The field accessors never fail: unknown ids return `""`, `0` or `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieDatabase {
    movies: BTreeMap<MovieId, Movie>,
}

impl MovieDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movie, replacing any previous row with the same id.
    pub fn insert(&mut self, movie: Movie) {
        self.movies.insert(movie.id.clone(), movie);
    }

    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.movies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movie ids in ascending order.
    pub fn movie_ids(&self) -> impl Iterator<Item = &MovieId> {
        self.movies.keys()
    }

    /// All movies in ascending id order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Ids of the movies accepted by `predicate`, in ascending id order.
    pub fn filter_by<F>(&self, mut predicate: F) -> Vec<MovieId>
    where
        F: FnMut(&str) -> bool,
    {
        self.movies
            .keys()
            .filter(|id| predicate(id))
            .cloned()
            .collect()
    }

    pub fn title(&self, id: &str) -> &str {
        self.get(id).map(|m| m.title.as_str()).unwrap_or("")
    }

    pub fn year(&self, id: &str) -> i32 {
        self.get(id).map(|m| m.year).unwrap_or(0)
    }

    pub fn country(&self, id: &str) -> &str {
        self.get(id).map(|m| m.country.as_str()).unwrap_or("")
    }

    pub fn genres(&self, id: &str) -> &str {
        self.get(id).map(|m| m.genres.as_str()).unwrap_or("")
    }

    pub fn director(&self, id: &str) -> &str {
        self.get(id).map(|m| m.director.as_str()).unwrap_or("")
    }

    pub fn minutes(&self, id: &str) -> u32 {
        self.get(id).map(|m| m.minutes).unwrap_or(0)
    }

    pub fn poster(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(|m| m.poster.as_deref())
    }
}

impl FromIterator<Movie> for MovieDatabase {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut db = MovieDatabase::new();
        for movie in iter {
            db.insert(movie);
        }
        db
    }
}

// =============================================================================
// RaterDatabase
// =============================================================================

/// Read-only table of raters keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaterDatabase {
    raters: BTreeMap<RaterId, Rater>,
}

impl RaterDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rating, creating the rater on first sight.
    pub fn add_rating(&mut self, rater_id: &str, movie_id: impl Into<MovieId>, rating: f64) {
        self.raters
            .entry(rater_id.to_string())
            .or_insert_with(|| Rater::new(rater_id))
            .add_rating(movie_id, rating);
    }

    /// Insert a whole rater, replacing any previous rater with the same id.
    pub fn insert(&mut self, rater: Rater) {
        self.raters.insert(rater.id.clone(), rater);
    }

    pub fn get(&self, id: &str) -> Option<&Rater> {
        self.raters.get(id)
    }

    pub fn len(&self) -> usize {
        self.raters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raters.is_empty()
    }

    /// All raters in ascending id order.
    pub fn raters(&self) -> impl Iterator<Item = &Rater> {
        self.raters.values()
    }

    /// Total number of ratings across all raters.
    pub fn num_ratings(&self) -> usize {
        self.raters.values().map(Rater::num_ratings).sum()
    }
}

impl FromIterator<Rater> for RaterDatabase {
    fn from_iter<I: IntoIterator<Item = Rater>>(iter: I) -> Self {
        let mut db = RaterDatabase::new();
        for rater in iter {
            db.insert(rater);
        }
        db
    }
}

// =============================================================================
// DataIndex - the immutable snapshot
// =============================================================================

/// The snapshot every recommendation request reads.
///
/// Built once by the loader, then shared as `Arc<DataIndex>`. Nothing mutates
/// it after construction; refreshing data means building a new `DataIndex`.
#[derive(Debug, Clone, Default)]
pub struct DataIndex {
    pub movies: MovieDatabase,
    pub raters: RaterDatabase,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(movies: MovieDatabase, raters: RaterDatabase) -> Self {
        Self { movies, raters }
    }

    /// (movies, raters, ratings) counts for logging
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.raters.len(), self.raters.num_ratings())
    }
}
