//! The recommendation engine handle.

use data_loader::DataIndex;
use std::sync::Arc;

/// User-based collaborative filtering over one `DataIndex` snapshot.
///
/// The engine only reads the snapshot, so it is cheap to clone and safe to
/// share between threads. Operations are split across modules:
/// - `averages`: per-movie average ratings
/// - `similarity`: rater-to-rater similarity
/// - `recommendations`: similarity-weighted predictions
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    /// Shared reference to the snapshot
    pub(crate) data_index: Arc<DataIndex>,
}

impl RecommendationEngine {
    /// Create an engine over a loaded snapshot.
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    /// The snapshot this engine reads.
    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }
}
