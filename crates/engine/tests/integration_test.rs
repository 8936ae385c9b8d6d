//! Integration tests for the engine.
//!
//! These run every operation against one small but realistic snapshot and
//! check the properties that must hold for any data.

use data_loader::{DataIndex, Movie, MovieDatabase, RaterDatabase};
use engine::{RecommendationEngine, similarity};
use filters::{AllFilters, Filter, MinutesFilter, YearAfterFilter};
use std::sync::Arc;

fn create_test_setup() -> RecommendationEngine {
    let movies: MovieDatabase = [
        ("0068646", "The Godfather", 1972, 175),
        ("0088763", "Back to the Future", 1985, 116),
        ("0099685", "Goodfellas", 1990, 146),
        ("0107290", "Jurassic Park", 1993, 127),
        ("0110912", "Pulp Fiction", 1994, 154),
        ("0114369", "Se7en", 1995, 127),
        ("0120815", "Saving Private Ryan", 1998, 169),
        ("0133093", "The Matrix", 1999, 136),
        ("0172495", "Gladiator", 2000, 155),
        ("0209144", "Memento", 2000, 113),
        ("0266543", "Finding Nemo", 2003, 100),
        ("0361748", "Inglourious Basterds", 2009, 153),
    ]
    .into_iter()
    .map(|(id, title, year, minutes)| {
        let mut movie = Movie::new(id, title);
        movie.year = year;
        movie.minutes = minutes;
        movie
    })
    .collect();

    let ids: Vec<String> = movies.movie_ids().cloned().collect();
    let mut raters = RaterDatabase::new();

    // Deterministic pseudo-random ratings: 12 raters, each rating a
    // different subset of movies.
    for rater in 0..12u32 {
        for (idx, movie_id) in ids.iter().enumerate() {
            let seed = (rater * 7 + idx as u32 * 13) % 17;
            if seed % 3 == 0 {
                continue;
            }
            let rating = f64::from((seed + rater) % 11);
            raters.add_rating(&format!("r{rater:02}"), movie_id.as_str(), rating);
        }
    }

    RecommendationEngine::new(Arc::new(DataIndex::from_parts(movies, raters)))
}

fn rater_ids(engine: &RecommendationEngine) -> Vec<String> {
    engine
        .data_index()
        .raters
        .raters()
        .map(|r| r.id.clone())
        .collect()
}

#[test]
fn test_similarity_is_symmetric() {
    let engine = create_test_setup();
    let raters = &engine.data_index().raters;

    for a in raters.raters() {
        for b in raters.raters() {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }
}

#[test]
fn test_similar_raters_are_positive_sorted_and_exclude_self() {
    let engine = create_test_setup();

    for id in rater_ids(&engine) {
        let similar = engine.similar_raters(&id);
        assert!(similar.iter().all(|s| s.weight > 0.0), "non-positive weight for {id}");
        assert!(similar.iter().all(|s| s.rater_id != id), "{id} is similar to itself");
        assert!(similar.windows(2).all(|w| w[0].weight >= w[1].weight));
    }
}

#[test]
fn test_rankings_are_monotonic() {
    let engine = create_test_setup();

    let averages = engine.average_ratings(1);
    assert!(!averages.is_empty());
    assert!(averages.windows(2).all(|w| w[0].value <= w[1].value));

    for id in rater_ids(&engine) {
        let recs = engine.recommendations(&id, 5, 1);
        assert!(recs.windows(2).all(|w| w[0].value >= w[1].value));
    }
}

#[test]
fn test_average_threshold_respected() {
    let engine = create_test_setup();
    let raters = &engine.data_index().raters;

    for movie_id in engine.data_index().movies.movie_ids() {
        let count = raters.raters().filter(|r| r.has_rating(movie_id)).count();
        assert!(engine.average_rating(movie_id, count + 1).is_none());
        if count > 0 {
            assert!(engine.average_rating(movie_id, count).is_some());
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let engine = create_test_setup();
    let filter: Filter = AllFilters::new()
        .add_filter(YearAfterFilter::new(1990))
        .add_filter(MinutesFilter::new(100, 160))
        .into();

    assert_eq!(engine.average_ratings(2), engine.average_ratings(2));
    assert_eq!(engine.similar_raters("r03"), engine.similar_raters("r03"));
    assert_eq!(
        engine.recommendations_by_filter("r03", 6, 2, &filter),
        engine.recommendations_by_filter("r03", 6, 2, &filter)
    );
}

#[test]
fn test_filter_restricts_both_averages_and_recommendations() {
    let engine = create_test_setup();
    let filter = Filter::from(MinutesFilter::new(90, 120));
    let movies = &engine.data_index().movies;

    for avg in engine.average_ratings_by_filter(1, &filter) {
        let minutes = movies.minutes(&avg.movie_id);
        assert!((90..=120).contains(&minutes));
    }
    for id in rater_ids(&engine) {
        for rec in engine.recommendations_by_filter(&id, 12, 1, &filter) {
            assert_ne!(rec.movie_id, "0110912", "Pulp Fiction runs 154 minutes");
        }
    }
}

#[test]
fn test_empty_snapshot_yields_empty_results() {
    let engine = RecommendationEngine::new(Arc::new(DataIndex::new()));

    assert!(engine.average_ratings(0).is_empty());
    assert!(engine.similar_raters("anyone").is_empty());
    assert!(engine.recommendations("anyone", 10, 0).is_empty());
    assert_eq!(engine.average_rating("anything", 0), None);
}

#[test]
fn test_end_to_end_from_csv() {
    use data_loader::parser::{read_movies, read_ratings_into};

    let movies_csv = "\
id,title,year,country,genre,director,minutes,poster
1,\"Short One\",2001,USA,\"Comedy\",\"Ava Lee\",95,N/A
2,\"Long One\",2002,USA,\"Drama\",\"Bo Kim\",150,N/A
3,\"Middle One\",2003,USA,\"Drama, Comedy\",\"Ava Lee\",110,N/A
";
    let ratings_csv = "\
rater_id,movie_id,rating,time
me,1,9,0
a,1,8,0
a,2,9,0
a,3,7,0
b,1,10,0
b,2,6,0
b,3,8,0
";
    let movies: MovieDatabase = read_movies(movies_csv.as_bytes(), "movies.csv")
        .unwrap()
        .into_iter()
        .collect();
    let mut raters = RaterDatabase::new();
    read_ratings_into(ratings_csv.as_bytes(), "ratings.csv", &mut raters).unwrap();
    let engine = RecommendationEngine::new(Arc::new(DataIndex::from_parts(movies, raters)));

    // (9 - 5) * (10 - 5)
    assert_eq!(engine.similarity_between("me", "b"), 20.0);

    let filter = Filter::from(MinutesFilter::new(90, 120));
    let recs = engine.recommendations_by_filter("me", 10, 2, &filter);
    let ids: Vec<&str> = recs.iter().map(|r| r.movie_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);

    let averages = engine.average_ratings_by_filter(2, &filter);
    assert!(averages.iter().all(|a| a.movie_id != "2"));
    assert_eq!(engine.average_rating("1", 3), Some(9.0));
}

#[test]
fn test_non_finite_rating_does_not_hide_similar_raters() {
    use data_loader::parser::read_ratings_into;

    let ratings_csv = "\
rater_id,movie_id,rating
a,m,NaN
a,n,9
b,m,8
b,n,9
";
    let mut raters = RaterDatabase::new();
    read_ratings_into(ratings_csv.as_bytes(), "ratings.csv", &mut raters).unwrap();
    let engine = RecommendationEngine::new(Arc::new(DataIndex::from_parts(
        MovieDatabase::new(),
        raters,
    )));

    // NaN is read as 0.0: (0 - 5) * (8 - 5) + (9 - 5) * (9 - 5)
    let similar = engine.similar_raters("a");
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].rater_id, "b");
    assert_eq!(similar[0].weight, 1.0);
    assert_eq!(engine.average_rating("m", 0), Some(4.0));
}
