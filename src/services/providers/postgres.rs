/// Postgres-backed workout data
///
/// Reads the same tables the mobile app writes:
/// - `exercises(id, name, muscle_group, equipment_required, type, difficulty)`
/// - `workouts(id, user_id, created_at)`
/// - `workout_exercises(workout_id, exercise_id)`
/// - `profiles(id, goal)`
///
/// `muscle_group` is stored as `text` on older rows and `text[]` on newer ones,
/// so it is read through `to_jsonb` and decoded into `MuscleGroups`.
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Exercise, ExerciseId, Goal, MuscleGroups, PeerProfile, TimeWindow, UserHistory,
        WorkoutExerciseLink, WorkoutId,
    },
    services::providers::WorkoutDataProvider,
};

const SELECT_EXERCISES: &str = r#"
    SELECT id::bigint AS id,
           name,
           to_jsonb(muscle_group) AS muscle_group,
           equipment_required,
           type AS exercise_type,
           difficulty
    FROM exercises
"#;

#[derive(Debug, sqlx::FromRow)]
struct ExerciseRecord {
    id: i64,
    name: String,
    muscle_group: Option<Json<MuscleGroups>>,
    equipment_required: Option<String>,
    exercise_type: Option<String>,
    difficulty: Option<String>,
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        Exercise {
            id: ExerciseId(record.id),
            name: record.name,
            muscle_group: record.muscle_group.map(|json| json.0),
            equipment: record.equipment_required,
            category: record.exercise_type,
            difficulty: record.difficulty,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LinkRecord {
    exercise_id: i64,
    workout_id: i64,
}

impl From<LinkRecord> for WorkoutExerciseLink {
    fn from(record: LinkRecord) -> Self {
        WorkoutExerciseLink {
            exercise_id: ExerciseId(record.exercise_id),
            workout_id: WorkoutId(record.workout_id),
        }
    }
}

#[derive(Clone)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_exercises_by_id(&self, ids: &[i64]) -> AppResult<Vec<Exercise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("{} WHERE id::bigint = ANY($1)", SELECT_EXERCISES);
        let records = sqlx::query_as::<_, ExerciseRecord>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(Exercise::from).collect())
    }
}

#[async_trait::async_trait]
impl WorkoutDataProvider for PostgresProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<Exercise>> {
        let query = format!("{} ORDER BY id", SELECT_EXERCISES);
        let records = sqlx::query_as::<_, ExerciseRecord>(&query)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = records.len(), "Loaded exercise catalog");

        Ok(records.into_iter().map(Exercise::from).collect())
    }

    async fn fetch_user_history(&self, user_id: Uuid) -> AppResult<UserHistory> {
        let links: Vec<WorkoutExerciseLink> = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT we.exercise_id::bigint AS exercise_id,
                   we.workout_id::bigint AS workout_id
            FROM workout_exercises we
            JOIN workouts w ON w.id = we.workout_id
            WHERE w.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(WorkoutExerciseLink::from)
        .collect();

        if links.is_empty() {
            tracing::info!(user_id = %user_id, "No workout exercises found for user");
            return Ok(UserHistory::default());
        }

        let mut exercise_ids: Vec<i64> = links.iter().map(|link| link.exercise_id.0).collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();

        let done_exercises = self.fetch_exercises_by_id(&exercise_ids).await?;

        Ok(UserHistory {
            workout_links: links,
            done_exercises,
        })
    }

    async fn fetch_user_goal(&self, user_id: Uuid) -> AppResult<Option<Goal>> {
        let goal: Option<Option<String>> =
            sqlx::query_scalar("SELECT goal FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(goal.flatten().as_deref().and_then(Goal::parse))
    }

    async fn fetch_peer_profiles(&self, exclude_user_id: Uuid) -> AppResult<Vec<PeerProfile>> {
        let rows: Vec<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, goal FROM profiles WHERE id <> $1")
                .bind(exclude_user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, goal)| PeerProfile {
                user_id,
                goal: goal.as_deref().and_then(Goal::parse),
            })
            .collect())
    }

    async fn fetch_cohort_workouts(
        &self,
        user_ids: &[Uuid],
        window: Option<TimeWindow>,
    ) -> AppResult<Vec<WorkoutId>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let start: Option<DateTime<Utc>> = window.map(|w| w.start);
        let end: Option<DateTime<Utc>> = window.map(|w| w.end);

        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id::bigint
            FROM workouts
            WHERE user_id = ANY($1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            "#,
        )
        .bind(user_ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(WorkoutId).collect())
    }

    async fn fetch_workout_exercise_links(
        &self,
        workout_ids: &[WorkoutId],
    ) -> AppResult<Vec<WorkoutExerciseLink>> {
        if workout_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = workout_ids.iter().map(|id| id.0).collect();
        let records = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT exercise_id::bigint AS exercise_id,
                   workout_id::bigint AS workout_id
            FROM workout_exercises
            WHERE workout_id::bigint = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(WorkoutExerciseLink::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
