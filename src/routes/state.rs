use std::sync::Arc;

use crate::{db::Cache, services::RecommendationService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<RecommendationService>,
    /// Present only when the catalog cache is enabled
    pub catalog_cache: Option<Cache>,
}

impl AppState {
    pub fn new(recommender: RecommendationService, catalog_cache: Option<Cache>) -> Self {
        Self {
            recommender: Arc::new(recommender),
            catalog_cache,
        }
    }
}
