//! # Recommendation Orchestrator
//!
//! This module serves recommendations for one rater at a time:
//! 1. Take the current data snapshot
//! 2. Predict scores with the collaborative filtering engine (blocking pool)
//! 3. Drop movies the rater has already rated
//! 4. Retry once with wider parameters if nothing is left
//! 5. Join the scores with movie metadata and return the top N
//!
//! The snapshot lives behind an `RwLock<Arc<DataIndex>>`. The lock is held
//! only to clone or replace the `Arc`, so a request keeps reading the
//! snapshot it started with even if a new one is swapped in meanwhile.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::RecommendationConfig;
use data_loader::{DataIndex, MovieId, RaterId};
use engine::{ItemScore, RecommendationEngine};
use filters::{Filter, TrueFilter};

/// Final recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub year: i32,
    pub country: String,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub minutes: u32,
    pub poster: Option<String>,
    pub score: f64,
    pub explanation: String,
}

/// Main orchestrator that serves recommendations from a shared snapshot
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    snapshot: Arc<RwLock<Arc<DataIndex>>>,
    config: Arc<RecommendationConfig>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self::with_config(data_index, RecommendationConfig::default())
    }

    pub fn with_config(data_index: Arc<DataIndex>, config: RecommendationConfig) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(data_index)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// The snapshot new requests will read.
    pub fn snapshot(&self) -> Arc<DataIndex> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new snapshot and return the previous one.
    ///
    /// Requests already running finish on the snapshot they started with.
    pub fn replace_snapshot(&self, data_index: Arc<DataIndex>) -> Arc<DataIndex> {
        let (movies, raters, ratings) = data_index.counts();
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, data_index);
        drop(guard);

        info!(
            "Replaced snapshot: {} movies, {} raters, {} ratings",
            movies, raters, ratings
        );
        previous
    }

    /// Main entry point: Get recommendations for a rater
    ///
    /// # Arguments
    /// * `rater_id` - The rater to recommend for
    /// * `limit` - Number of recommendations to return
    ///
    /// # Returns
    /// Movies the rater has not rated yet, highest predicted score first.
    /// An unknown rater gets an empty list.
    pub async fn get_recommendations(
        &self,
        rater_id: &str,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>> {
        self.get_recommendations_by_filter(rater_id, limit, &Filter::True(TrueFilter))
            .await
    }

    /// Like [`get_recommendations`](Self::get_recommendations), restricted to
    /// movies passing `filter`.
    #[instrument(skip(self, filter), fields(filter = %filter))]
    pub async fn get_recommendations_by_filter(
        &self,
        rater_id: &str,
        limit: usize,
        filter: &Filter,
    ) -> Result<Vec<MovieRecommendation>> {
        let start_time = Instant::now();
        let data_index = self.snapshot();

        if data_index.raters.get(rater_id).is_none() {
            warn!("Rater {} not found", rater_id);
            return Ok(Vec::new());
        }

        let engine = RecommendationEngine::new(data_index.clone());
        let mut num_similar = self.config.num_similar_raters;
        let mut scores = self
            .score_unseen(&engine, rater_id, num_similar, self.config.min_raters, filter)
            .await?;
        info!("Scored {} unseen movies for rater {}", scores.len(), rater_id);

        if scores.is_empty() {
            num_similar = self.config.fallback_similar_raters;
            info!(
                "Nothing new for rater {}, retrying with {} similar raters and minimum {}",
                rater_id, num_similar, self.config.fallback_min_raters
            );
            scores = self
                .score_unseen(
                    &engine,
                    rater_id,
                    num_similar,
                    self.config.fallback_min_raters,
                    filter,
                )
                .await?;
        }

        let explanation = format!("Predicted from the {} most similar raters", num_similar);
        let recommendations: Vec<MovieRecommendation> = scores
            .into_iter()
            .take(limit)
            .map(|score| to_recommendation(&data_index, score, &explanation))
            .collect();

        info!(
            "Total time to get {} recommendations for rater {}: {:.2?}",
            recommendations.len(),
            rater_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Run the engine on the blocking pool and drop already rated movies
    async fn score_unseen(
        &self,
        engine: &RecommendationEngine,
        rater_id: &str,
        num_similar_raters: usize,
        min_raters: usize,
        filter: &Filter,
    ) -> Result<Vec<ItemScore>> {
        let engine = engine.clone();
        let rater_id = rater_id.to_string();
        let filter = filter.clone();

        tokio::task::spawn_blocking(move || {
            let mut scores = engine.recommendations_by_filter(
                &rater_id,
                num_similar_raters,
                min_raters,
                &filter,
            );
            if let Some(rater) = engine.data_index().raters.get(&rater_id) {
                scores.retain(|score| !rater.has_rating(&score.movie_id));
            }
            scores
        })
        .await
        .context("Recommendation task panicked")
    }

    /// A random sample of `count` distinct movies for a new rater to rate.
    ///
    /// Movies come from the configured pool; if the pool holds fewer than
    /// `count` movies, every movie is eligible.
    pub fn items_to_rate(&self, count: usize) -> Vec<MovieId> {
        let data_index = self.snapshot();
        let movies = &data_index.movies;
        let filter = &self.config.items_to_rate_filter;

        let mut pool = movies.filter_by(|id| filter.satisfies(movies, id));
        if pool.len() < count {
            debug!(
                "Only {} movies match {}, sampling from all {}",
                pool.len(),
                filter,
                movies.len()
            );
            pool = movies.movie_ids().cloned().collect();
        }

        pool.choose_multiple(&mut rand::rng(), count)
            .cloned()
            .collect()
    }

    /// The rater with the most ratings, smallest id on ties.
    pub fn most_active_rater(&self) -> Option<RaterId> {
        self.snapshot()
            .raters
            .raters()
            .max_by(|a, b| {
                a.num_ratings()
                    .cmp(&b.num_ratings())
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|rater| rater.id.clone())
    }
}

fn to_recommendation(
    data_index: &DataIndex,
    score: ItemScore,
    explanation: &str,
) -> MovieRecommendation {
    let movies = &data_index.movies;
    let id = score.movie_id.as_str();

    MovieRecommendation {
        title: movies.title(id).to_string(),
        year: movies.year(id),
        country: movies.country(id).to_string(),
        genres: data_loader::types::split_names(movies.genres(id))
            .map(String::from)
            .collect(),
        directors: data_loader::types::split_names(movies.director(id))
            .map(String::from)
            .collect(),
        minutes: movies.minutes(id),
        poster: movies.poster(id).map(String::from),
        score: score.value,
        explanation: explanation.to_string(),
        movie_id: score.movie_id,
    }
}
