//! The closed set of movie predicates.
//!
//! Every filter answers one question: should this movie id be considered?
//! Filters are pure and read movie fields through the `MovieDatabase`
//! accessors, so an unknown id looks like a movie with every field empty or
//! zero.

use crate::all_filters::AllFilters;
use crate::directors::DirectorsFilter;
use crate::genre::GenreFilter;
use crate::minutes::MinutesFilter;
use crate::year_after::YearAfterFilter;
use data_loader::MovieDatabase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accepts every movie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFilter;

/// A predicate over a movie id.
///
/// ## Usage
/// ```ignore
/// let filter: Filter = AllFilters::new()
///     .add_filter(MinutesFilter::new(90, 120))
///     .add_filter(YearAfterFilter::new(2000))
///     .into();
///
/// let ids = index.movies.filter_by(|id| filter.satisfies(&index.movies, id));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    True(TrueFilter),
    Minutes(MinutesFilter),
    YearAfter(YearAfterFilter),
    Genre(GenreFilter),
    Directors(DirectorsFilter),
    All(AllFilters),
}

impl Filter {
    /// Returns true if the movie with `movie_id` passes this filter.
    pub fn satisfies(&self, movies: &MovieDatabase, movie_id: &str) -> bool {
        match self {
            Filter::True(_) => true,
            Filter::Minutes(f) => f.satisfies(movies, movie_id),
            Filter::YearAfter(f) => f.satisfies(movies, movie_id),
            Filter::Genre(f) => f.satisfies(movies, movie_id),
            Filter::Directors(f) => f.satisfies(movies, movie_id),
            Filter::All(f) => f.satisfies(movies, movie_id),
        }
    }

    /// Short variant name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Filter::True(_) => "TrueFilter",
            Filter::Minutes(_) => "MinutesFilter",
            Filter::YearAfter(_) => "YearAfterFilter",
            Filter::Genre(_) => "GenreFilter",
            Filter::Directors(_) => "DirectorsFilter",
            Filter::All(_) => "AllFilters",
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::True(TrueFilter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::True(_) => write!(f, "any movie"),
            Filter::Minutes(m) => write!(f, "{}-{} minutes", m.min, m.max),
            Filter::YearAfter(y) => write!(f, "released in or after {}", y.year),
            Filter::Genre(g) => write!(f, "genre {}", g.genre),
            Filter::Directors(d) => write!(f, "directed by {}", d.directors.join(" or ")),
            Filter::All(all) if all.is_empty() => write!(f, "any movie"),
            Filter::All(all) => {
                let parts: Vec<String> = all.filters().iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

impl From<TrueFilter> for Filter {
    fn from(f: TrueFilter) -> Self {
        Filter::True(f)
    }
}

impl From<MinutesFilter> for Filter {
    fn from(f: MinutesFilter) -> Self {
        Filter::Minutes(f)
    }
}

impl From<YearAfterFilter> for Filter {
    fn from(f: YearAfterFilter) -> Self {
        Filter::YearAfter(f)
    }
}

impl From<GenreFilter> for Filter {
    fn from(f: GenreFilter) -> Self {
        Filter::Genre(f)
    }
}

impl From<DirectorsFilter> for Filter {
    fn from(f: DirectorsFilter) -> Self {
        Filter::Directors(f)
    }
}

impl From<AllFilters> for Filter {
    fn from(f: AllFilters) -> Self {
        Filter::All(f)
    }
}
