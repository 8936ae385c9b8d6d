//! Parser for the rated-movies CSV files.
//!
//! - movies:  id,title,year,country,genre,director,minutes,poster
//! - ratings: rater_id,movie_id,rating,time
//!
//! Columns are located by header name, case-insensitively, so column order
//! does not matter and both `genre` and `genres` are accepted. Movie fields
//! that are missing or unparseable fall back to empty/zero values. Quoted
//! fields and doubled-quote escapes are handled by the `csv` crate.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Maps lowercase header names to column positions.
struct Columns {
    positions: HashMap<String, usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Self {
        let positions = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim_start_matches('\u{feff}').trim().to_lowercase();
                (name, idx)
            })
            .collect();
        Self { positions }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// First of `names` present in the header.
    fn position_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.position(name))
    }

    fn require(&self, name: &str, file: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| DataLoadError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
    }
}

/// Field at `idx`, trimmed; `""` when the column is absent or the row short.
fn field(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

fn parse_int_or_zero<T: std::str::FromStr + Default>(s: &str) -> T {
    s.trim().parse().unwrap_or_default()
}

fn parse_poster(s: &str) -> Option<String> {
    match s.trim() {
        "" | "N/A" => None,
        poster => Some(poster.to_string()),
    }
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Parse the movies file at `path`.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    read_movies(open(path)?, &file_label(path))
}

/// Parse movie rows from any reader. `file` is only used in errors and logs.
pub fn read_movies<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut reader = csv_reader(reader);
    let to_error = |source: csv::Error| DataLoadError::Csv {
        file: file.to_string(),
        source,
    };

    let columns = Columns::from_header(reader.headers().map_err(to_error)?);
    let id_col = columns.position("id");
    let title_col = columns.position("title");
    let year_col = columns.position("year");
    let country_col = columns.position("country");
    let genres_col = columns.position_any(&["genres", "genre"]);
    let director_col = columns.position("director");
    let minutes_col = columns.position("minutes");
    let poster_col = columns.position("poster");

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record.map_err(to_error)?;

        let id = field(&record, id_col);
        if id.is_empty() {
            continue;
        }

        movies.push(Movie {
            id: id.to_string(),
            title: field(&record, title_col).to_string(),
            year: parse_int_or_zero(field(&record, year_col)),
            country: field(&record, country_col).to_string(),
            genres: field(&record, genres_col).to_string(),
            director: field(&record, director_col).to_string(),
            minutes: parse_int_or_zero(field(&record, minutes_col)),
            poster: parse_poster(field(&record, poster_col)),
        });
    }

    debug!("Parsed {} movies from {}", movies.len(), file);
    Ok(movies)
}

/// Parse the ratings file at `path` and group the rows by rater.
pub fn parse_ratings(path: &Path) -> Result<RaterDatabase> {
    let mut raters = RaterDatabase::new();
    read_ratings_into(open(path)?, &file_label(path), &mut raters)?;
    Ok(raters)
}

/// Parse rating rows from any reader into an existing table.
///
/// Returns the number of rows read. A repeated (rater, movie) pair replaces
/// the earlier rating.
pub fn read_ratings_into<R: Read>(
    reader: R,
    file: &str,
    raters: &mut RaterDatabase,
) -> Result<usize> {
    let mut reader = csv_reader(reader);
    let to_error = |source: csv::Error| DataLoadError::Csv {
        file: file.to_string(),
        source,
    };

    let columns = Columns::from_header(reader.headers().map_err(to_error)?);
    let rater_col = columns.require("rater_id", file)?;
    let movie_col = columns.require("movie_id", file)?;
    let rating_col = columns.require("rating", file)?;

    let mut rows = 0;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(to_error)?;
        let rater_id = field(&record, Some(rater_col));
        let movie_id = field(&record, Some(movie_col));
        if rater_id.is_empty() || movie_id.is_empty() {
            continue;
        }

        let raw = field(&record, Some(rating_col));
        // NaN and infinities parse as f64 but would poison every similarity
        let rating = match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                // line 1 is the header
                warn!(file, line = idx + 2, value = raw, "Unparseable rating, using 0.0");
                0.0
            }
        };

        raters.add_rating(rater_id, movie_id, rating);
        rows += 1;
    }

    debug!("Parsed {} ratings from {}", rows, file);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
id,title,year,country,genre,director,minutes,poster
0006414,\"Behind the Screen\",1916,\"USA\",\"Comedy, Short\",\"Charles Chaplin\",30,\"http://example.com/a.jpg\"
0068646,\"The Godfather\",1972,USA,\"Crime, Drama\",Francis Ford Coppola,175,N/A
,\"No Id\",2000,USA,Drama,Nobody,90,
0113277,\"Heat \"\"95\"\"\",19x5,USA,Action,Michael Mann,,
";

    #[test]
    fn test_read_movies() {
        let movies = read_movies(MOVIES.as_bytes(), "movies.csv").unwrap();

        // Row without an id is skipped
        assert_eq!(movies.len(), 3);

        let chaplin = &movies[0];
        assert_eq!(chaplin.id, "0006414");
        assert_eq!(chaplin.title, "Behind the Screen");
        assert_eq!(chaplin.year, 1916);
        assert_eq!(chaplin.genres, "Comedy, Short");
        assert_eq!(chaplin.minutes, 30);
        assert_eq!(chaplin.poster.as_deref(), Some("http://example.com/a.jpg"));

        assert_eq!(movies[1].poster, None);
        assert_eq!(movies[1].director, "Francis Ford Coppola");
    }

    #[test]
    fn test_bad_numbers_default_to_zero() {
        let movies = read_movies(MOVIES.as_bytes(), "movies.csv").unwrap();
        let heat = &movies[2];

        assert_eq!(heat.title, "Heat \"95\"");
        assert_eq!(heat.year, 0);
        assert_eq!(heat.minutes, 0);
    }

    #[test]
    fn test_header_variants() {
        let data = "\u{feff}ID,Title,Genres,Minutes\n42,Answer,Sci-Fi,101\n";
        let movies = read_movies(data.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, "42");
        assert_eq!(movies[0].genres, "Sci-Fi");
        assert_eq!(movies[0].minutes, 101);
        assert_eq!(movies[0].country, "");
    }

    #[test]
    fn test_read_ratings() {
        let data = "\
rater_id,movie_id,rating,time
1,0068646,10,1381620027
1,0113277,8,1379466669
2,0068646,7,1389948338
2,0068646,9,1389948339
3,0113277,abc,1389948340
";
        let mut raters = RaterDatabase::new();
        let rows = read_ratings_into(data.as_bytes(), "ratings.csv", &mut raters).unwrap();

        assert_eq!(rows, 5);
        assert_eq!(raters.len(), 3);
        assert_eq!(raters.get("1").unwrap().num_ratings(), 2);
        // Later row for the same movie wins
        assert_eq!(raters.get("2").unwrap().rating("0068646"), Some(9.0));
        assert_eq!(raters.get("3").unwrap().rating("0113277"), Some(0.0));
    }

    #[test]
    fn test_non_finite_ratings_become_zero() {
        let data = "\
rater_id,movie_id,rating
a,m,NaN
a,n,9
b,m,inf
b,n,-infinity
";
        let mut raters = RaterDatabase::new();
        read_ratings_into(data.as_bytes(), "ratings.csv", &mut raters).unwrap();

        let a = raters.get("a").unwrap();
        assert_eq!(a.rating("m"), Some(0.0));
        assert_eq!(a.rating("n"), Some(9.0));
        let b = raters.get("b").unwrap();
        assert_eq!(b.rating("m"), Some(0.0));
        assert_eq!(b.rating("n"), Some(0.0));
    }

    #[test]
    fn test_ratings_missing_column() {
        let data = "rater,movie_id,rating\n1,2,3\n";
        let mut raters = RaterDatabase::new();
        let result = read_ratings_into(data.as_bytes(), "ratings.csv", &mut raters);

        assert!(matches!(
            result,
            Err(DataLoadError::MissingColumn { ref column, .. }) if column == "rater_id"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_movies(Path::new("definitely/not/here.csv"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
