/// Read-through catalog cache
///
/// Wraps another provider and serves `fetch_catalog` from Redis for `ttl`
/// seconds. Entries expire on their own and can be dropped early through
/// `Cache::invalidate(&CacheKey::ExerciseCatalog)`. Empty catalogs are never
/// stored, so a failed upstream fetch is retried on the next request.
/// All other reads go straight to the wrapped provider.
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{Exercise, Goal, PeerProfile, TimeWindow, UserHistory, WorkoutExerciseLink, WorkoutId},
    services::providers::WorkoutDataProvider,
};

pub struct CachedCatalogProvider {
    inner: Arc<dyn WorkoutDataProvider>,
    cache: Cache,
    ttl: u64,
}

impl CachedCatalogProvider {
    pub fn new(inner: Arc<dyn WorkoutDataProvider>, cache: Cache, ttl: u64) -> Self {
        tracing::info!(provider = inner.name(), ttl, "Catalog cache enabled");
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl WorkoutDataProvider for CachedCatalogProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<Exercise>> {
        let inner = self.inner.clone();
        cached!(
            self.cache,
            CacheKey::ExerciseCatalog,
            self.ttl,
            async move { inner.fetch_catalog().await },
            |catalog: &Vec<Exercise>| !catalog.is_empty()
        )
    }

    async fn fetch_user_history(&self, user_id: Uuid) -> AppResult<UserHistory> {
        self.inner.fetch_user_history(user_id).await
    }

    async fn fetch_user_goal(&self, user_id: Uuid) -> AppResult<Option<Goal>> {
        self.inner.fetch_user_goal(user_id).await
    }

    async fn fetch_peer_profiles(&self, exclude_user_id: Uuid) -> AppResult<Vec<PeerProfile>> {
        self.inner.fetch_peer_profiles(exclude_user_id).await
    }

    async fn fetch_cohort_workouts(
        &self,
        user_ids: &[Uuid],
        window: Option<TimeWindow>,
    ) -> AppResult<Vec<WorkoutId>> {
        self.inner.fetch_cohort_workouts(user_ids, window).await
    }

    async fn fetch_workout_exercise_links(
        &self,
        workout_ids: &[WorkoutId],
    ) -> AppResult<Vec<WorkoutExerciseLink>> {
        self.inner.fetch_workout_exercise_links(workout_ids).await
    }

    fn name(&self) -> &'static str {
        "cached"
    }
}
