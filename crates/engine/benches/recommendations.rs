//! Benchmarks for the collaborative filtering operations
//!
//! Run with: cargo bench --package engine
//!
//! Uses a synthetic snapshot (1000 raters, 2000 movies) so the numbers do not
//! depend on a dataset being present.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{DataIndex, Movie, MovieDatabase, RaterDatabase};
use engine::RecommendationEngine;
use filters::{Filter, MinutesFilter};
use std::sync::Arc;

const NUM_MOVIES: u32 = 2000;
const NUM_RATERS: u32 = 1000;
const RATINGS_PER_RATER: u32 = 60;

fn build_test_data() -> Arc<DataIndex> {
    let movies: MovieDatabase = (0..NUM_MOVIES)
        .map(|i| {
            let mut movie = Movie::new(format!("{:07}", i), format!("Movie {}", i));
            movie.year = 1950 + (i % 70) as i32;
            movie.minutes = 80 + i % 100;
            movie
        })
        .collect();

    let mut raters = RaterDatabase::new();
    for rater in 0..NUM_RATERS {
        let rater_id = rater.to_string();
        for k in 0..RATINGS_PER_RATER {
            // Linear congruential spread over the movie ids
            let movie = (rater * 31 + k * 97 + k * k) % NUM_MOVIES;
            let rating = f64::from((rater + movie) % 11);
            raters.add_rating(&rater_id, format!("{:07}", movie), rating);
        }
    }

    Arc::new(DataIndex::from_parts(movies, raters))
}

fn bench_similar_raters(c: &mut Criterion) {
    let engine = RecommendationEngine::new(build_test_data());

    c.bench_function("similar_raters", |b| {
        b.iter(|| {
            let similar = engine.similar_raters(black_box("1"));
            black_box(similar)
        })
    });
}

fn bench_recommendations(c: &mut Criterion) {
    let engine = RecommendationEngine::new(build_test_data());
    let filter = Filter::from(MinutesFilter::new(85, 180));

    c.bench_function("recommendations_by_filter", |b| {
        b.iter(|| {
            let recs = engine.recommendations_by_filter(
                black_box("1"),
                black_box(20),
                black_box(5),
                &filter,
            );
            black_box(recs)
        })
    });
}

fn bench_average_ratings(c: &mut Criterion) {
    let engine = RecommendationEngine::new(build_test_data());

    c.bench_function("average_ratings", |b| {
        b.iter(|| {
            let averages = engine.average_ratings(black_box(5));
            black_box(averages)
        })
    });
}

criterion_group!(
    benches,
    bench_similar_raters,
    bench_recommendations,
    bench_average_ratings
);
criterion_main!(benches);
