//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate contains the orchestrator that serves recommendations from a
//! shared, swappable data snapshot.

pub mod config;
pub mod orchestrator;

pub use config::RecommendationConfig;
pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};
