/// Workout data provider abstraction
///
/// The recommendation core never talks to storage directly. Every read goes
/// through a `WorkoutDataProvider`, which lets the same core run against
/// Postgres, the Supabase REST API, a cached decorator or an in-memory fixture.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Exercise, Goal, PeerProfile, TimeWindow, UserHistory, WorkoutExerciseLink, WorkoutId},
};

pub mod cached;
pub mod postgres;
pub mod supabase;

pub use cached::CachedCatalogProvider;
pub use postgres::PostgresProvider;
pub use supabase::SupabaseProvider;

/// Trait for workout data sources
///
/// Implementations report failures as errors; callers in the core decide how
/// to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WorkoutDataProvider: Send + Sync {
    /// Full exercise catalog
    async fn fetch_catalog(&self) -> AppResult<Vec<Exercise>>;

    /// Workout links and performed-exercise details for one user
    async fn fetch_user_history(&self, user_id: Uuid) -> AppResult<UserHistory>;

    /// Stated goal of one user, `None` when absent or unrecognized
    async fn fetch_user_goal(&self, user_id: Uuid) -> AppResult<Option<Goal>>;

    /// Every user except `exclude_user_id`, with their goals
    async fn fetch_peer_profiles(&self, exclude_user_id: Uuid) -> AppResult<Vec<PeerProfile>>;

    /// Workouts logged by `user_ids`, optionally restricted to an inclusive window
    async fn fetch_cohort_workouts(
        &self,
        user_ids: &[Uuid],
        window: Option<TimeWindow>,
    ) -> AppResult<Vec<WorkoutId>>;

    /// Exercise occurrences inside `workout_ids`
    async fn fetch_workout_exercise_links(
        &self,
        workout_ids: &[WorkoutId],
    ) -> AppResult<Vec<WorkoutExerciseLink>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
