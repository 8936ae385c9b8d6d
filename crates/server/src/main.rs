//! Simple test harness for the recommendation orchestrator.
//!
//! Loads the rated-movies dataset and prints recommendations for the rater
//! given as the first argument, or for the most active rater.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use data_loader::DataIndex;
use server::RecommendationOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,server=debug")),
        )
        .init();

    info!("Starting ReelRecs server test harness");

    let data_index = Arc::new(
        DataIndex::load_from_files(
            Path::new("data/ratedmoviesfull.csv"),
            Path::new("data/ratings.csv"),
        )
        .context("Failed to load dataset")?,
    );
    let orchestrator = RecommendationOrchestrator::new(data_index);

    let rater_id = match std::env::args().nth(1) {
        Some(id) => id,
        None => orchestrator
            .most_active_rater()
            .context("Dataset has no raters")?,
    };
    let limit = orchestrator.config().max_results;

    info!("Getting recommendations for rater {} (limit: {})", rater_id, limit);
    let recommendations = orchestrator.get_recommendations(&rater_id, limit).await?;

    info!("Received {} recommendations:", recommendations.len());
    for (i, rec) in recommendations.iter().enumerate() {
        info!(
            "{}. {} ({}) - Score: {:.3}",
            i + 1,
            rec.title,
            rec.year,
            rec.score
        );
        info!("   Genres: {}", rec.genres.join(", "));
        info!("   {}", rec.explanation);
    }

    let items = orchestrator.items_to_rate(orchestrator.config().items_to_rate);
    info!("Movies to rate next: {}", items.join(", "));

    Ok(())
}
