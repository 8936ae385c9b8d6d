//! DataIndex building and validation.
//!
//! Loading happens once, up front:
//! 1. Parse the movies and ratings files in parallel
//! 2. Assemble the `DataIndex` snapshot
//! 3. Validate it and log anything suspicious
//!
//! Validation never rejects data. The engine tolerates ratings for unknown
//! movies and values off the 0-10 scale, so they are only reported.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

/// Findings from [`DataIndex::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Ratings whose movie id is not in the movie table
    pub unknown_movie_ratings: usize,
    /// Ratings outside the `MIN_RATING..=MAX_RATING` scale
    pub out_of_scale_ratings: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_movie_ratings == 0 && self.out_of_scale_ratings == 0
    }
}

impl DataIndex {
    /// Load the movies and ratings files into a new snapshot.
    ///
    /// Rayon's `join` parses both files at the same time; the first error
    /// from either side is returned.
    pub fn load_from_files(movies_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            "Loading movies from {:?} and ratings from {:?}",
            movies_path, ratings_path
        );

        let (movies, raters) = rayon::join(
            || parser::parse_movies(movies_path),
            || parser::parse_ratings(ratings_path),
        );
        let movies: MovieDatabase = movies?.into_iter().collect();
        let raters = raters?;

        let index = DataIndex::from_parts(movies, raters);
        let (movie_count, rater_count, rating_count) = index.counts();
        info!(
            "Loaded {} movies, {} raters, {} ratings",
            movie_count, rater_count, rating_count
        );

        index.validate();
        Ok(index)
    }

    /// Merge another ratings file into this index's rater table.
    ///
    /// Used while assembling a snapshot, before it is shared.
    pub fn add_ratings(&mut self, ratings_path: &Path) -> Result<usize> {
        let file = parser::file_label(ratings_path);
        let reader = parser::open(ratings_path)?;
        let rows = parser::read_ratings_into(reader, &file, &mut self.raters)?;
        info!("Merged {} ratings from {}", rows, file);
        Ok(rows)
    }

    /// Check rating references and the rating scale.
    ///
    /// Logs one warning per kind of problem and returns the counts.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        for rater in self.raters.raters() {
            for (movie_id, rating) in rater.ratings() {
                if !self.movies.contains(movie_id) {
                    report.unknown_movie_ratings += 1;
                }
                if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                    report.out_of_scale_ratings += 1;
                }
            }
        }

        if report.unknown_movie_ratings > 0 {
            warn!(
                "{} ratings reference movies missing from the movie table",
                report.unknown_movie_ratings
            );
        }
        if report.out_of_scale_ratings > 0 {
            warn!(
                "{} ratings fall outside the {}-{} scale",
                report.out_of_scale_ratings, MIN_RATING, MAX_RATING
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A file in the temp dir, removed when dropped.
    struct TempFile(std::path::PathBuf);

    impl TempFile {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "data-loader-{}-{}",
                std::process::id(),
                name
            ));
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
            Self(path)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_load_from_files() {
        let movies = TempFile::new(
            "movies.csv",
            "id,title,year,minutes\n1,One,2001,100\n2,Two,2002,150\n",
        );
        let ratings = TempFile::new(
            "ratings.csv",
            "rater_id,movie_id,rating,time\n10,1,8,0\n10,2,6,0\n11,1,12,0\n11,9,5,0\n",
        );

        let index = DataIndex::load_from_files(movies.path(), ratings.path()).unwrap();
        assert_eq!(index.counts(), (2, 2, 4));

        let report = index.validate();
        assert_eq!(report.unknown_movie_ratings, 1);
        assert_eq!(report.out_of_scale_ratings, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_add_ratings_merges() {
        let movies = TempFile::new("merge-movies.csv", "id,title\n1,One\n");
        let first = TempFile::new("merge-a.csv", "rater_id,movie_id,rating\n1,1,4\n");
        let second = TempFile::new("merge-b.csv", "rater_id,movie_id,rating\n1,1,9\n2,1,3\n");

        let mut index = DataIndex::load_from_files(movies.path(), first.path()).unwrap();
        let rows = index.add_ratings(second.path()).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(index.raters.len(), 2);
        assert_eq!(index.raters.get("1").unwrap().rating("1"), Some(9.0));
    }

    #[test]
    fn test_temp_files_are_removed() {
        let path = {
            let file = TempFile::new("cleanup.csv", "id,title\n");
            assert!(file.path().exists());
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_index_is_clean() {
        assert!(DataIndex::new().validate().is_clean());
    }
}
