/// Supabase REST provider
///
/// Talks to the project's PostgREST endpoint (`/rest/v1/<table>`) with the
/// service role key, using the same tables as the Postgres provider.
///
/// Filter syntax used here:
/// - `eq.<v>` / `neq.<v>` for single values
/// - `in.(a,b,c)` for id lists
/// - `gte.<ts>` / `lte.<ts>` for the inclusive time window
///
/// Reads are paged with `limit`/`offset` under a stable `order`, and id lists
/// are split into bounded `in.(...)` batches to keep URLs short.
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};
use std::fmt::Display;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Exercise, Goal, PeerProfile, TimeWindow, UserHistory, WorkoutExerciseLink, WorkoutId},
    services::providers::WorkoutDataProvider,
};

const EXERCISE_COLUMNS: &str = "id,name,muscle_group,equipment_required,type,difficulty";

/// Rows per request; must not exceed the project's PostgREST max-rows setting
const PAGE_SIZE: usize = 1000;

/// Ids per `in.(...)` filter
const IN_FILTER_BATCH: usize = 100;

#[derive(Debug, Deserialize)]
struct IdRow<T> {
    id: T,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    #[serde(default)]
    goal: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseProvider {
    http_client: HttpClient,
    base_url: String,
    service_key: String,
}

/// Formats a PostgREST `in.(...)` filter
fn in_filter<T: Display>(values: &[T]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", joined)
}

/// Inclusive `created_at` bounds for an optional window
fn window_filters(window: Option<TimeWindow>) -> Vec<(&'static str, String)> {
    match window {
        Some(window) => vec![
            ("created_at", format!("gte.{}", window.start.to_rfc3339())),
            ("created_at", format!("lte.{}", window.end.to_rfc3339())),
        ],
        None => Vec::new(),
    }
}

fn page_params(order: &str, offset: usize) -> [(&'static str, String); 3] {
    [
        ("order", order.to_string()),
        ("limit", PAGE_SIZE.to_string()),
        ("offset", offset.to_string()),
    ]
}

impl SupabaseProvider {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
            service_key,
        }
    }

    /// Runs a select against one table, following pages until a short one
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        order: &str,
    ) -> AppResult<Vec<T>> {
        let mut rows = Vec::new();

        loop {
            let page: Vec<T> = self.select_page(table, query, order, rows.len()).await?;
            let last = page.len() < PAGE_SIZE;
            rows.extend(page);

            if last {
                break;
            }
        }

        tracing::debug!(table = %table, rows = rows.len(), "Supabase select complete");
        Ok(rows)
    }

    /// Runs `select` once per batch of `ids` filtered on `column`
    async fn select_in<T: DeserializeOwned, I: Display>(
        &self,
        table: &str,
        query: &[(&str, String)],
        column: &str,
        ids: &[I],
        order: &str,
    ) -> AppResult<Vec<T>> {
        let mut rows = Vec::new();

        for batch in ids.chunks(IN_FILTER_BATCH) {
            let mut batch_query = query.to_vec();
            batch_query.push((column, in_filter(batch)));
            rows.extend(self.select::<T>(table, &batch_query, order).await?);
        }

        Ok(rows)
    }

    async fn select_page<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        order: &str,
        offset: usize,
    ) -> AppResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(query)
            .query(&page_params(order, offset))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                table = %table,
                status = %status,
                body = %body,
                "Supabase request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Supabase returned status {} for {}: {}",
                status, table, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl WorkoutDataProvider for SupabaseProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<Exercise>> {
        let exercises: Vec<Exercise> = self
            .select(
                "exercises",
                &[("select", EXERCISE_COLUMNS.to_string())],
                "id.asc",
            )
            .await?;

        tracing::debug!(count = exercises.len(), "Loaded exercise catalog");
        Ok(exercises)
    }

    async fn fetch_user_history(&self, user_id: Uuid) -> AppResult<UserHistory> {
        let workouts: Vec<IdRow<WorkoutId>> = self
            .select(
                "workouts",
                &[
                    ("select", "id".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                ],
                "id.asc",
            )
            .await?;

        if workouts.is_empty() {
            tracing::info!(user_id = %user_id, "No workouts found for user");
            return Ok(UserHistory::default());
        }

        let workout_ids: Vec<WorkoutId> = workouts.into_iter().map(|row| row.id).collect();
        let workout_links = self.fetch_workout_exercise_links(&workout_ids).await?;

        if workout_links.is_empty() {
            tracing::info!(user_id = %user_id, "No workout exercises found for user");
            return Ok(UserHistory::default());
        }

        let mut exercise_ids: Vec<i64> = workout_links.iter().map(|l| l.exercise_id.0).collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();

        let done_exercises: Vec<Exercise> = self
            .select_in(
                "exercises",
                &[("select", EXERCISE_COLUMNS.to_string())],
                "id",
                &exercise_ids,
                "id.asc",
            )
            .await?;

        if done_exercises.is_empty() {
            tracing::warn!(user_id = %user_id, "Could not fetch details for performed exercises");
        }

        Ok(UserHistory {
            workout_links,
            done_exercises,
        })
    }

    async fn fetch_user_goal(&self, user_id: Uuid) -> AppResult<Option<Goal>> {
        let profiles: Vec<ProfileRow> = self
            .select(
                "profiles",
                &[
                    ("select", "id,goal".to_string()),
                    ("id", format!("eq.{}", user_id)),
                ],
                "id.asc",
            )
            .await?;

        Ok(profiles
            .into_iter()
            .next()
            .and_then(|profile| profile.goal)
            .as_deref()
            .and_then(Goal::parse))
    }

    async fn fetch_peer_profiles(&self, exclude_user_id: Uuid) -> AppResult<Vec<PeerProfile>> {
        let profiles: Vec<ProfileRow> = self
            .select(
                "profiles",
                &[
                    ("select", "id,goal".to_string()),
                    ("id", format!("neq.{}", exclude_user_id)),
                ],
                "id.asc",
            )
            .await?;

        Ok(profiles
            .into_iter()
            .map(|row| PeerProfile {
                user_id: row.id,
                goal: row.goal.as_deref().and_then(Goal::parse),
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

        let mut query = vec![("select", "id".to_string())];
        query.extend(window_filters(window));

        let rows: Vec<IdRow<WorkoutId>> = self
            .select_in("workouts", &query, "user_id", user_ids, "id.asc")
            .await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn fetch_workout_exercise_links(
        &self,
        workout_ids: &[WorkoutId],
    ) -> AppResult<Vec<WorkoutExerciseLink>> {
        if workout_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = workout_ids.iter().map(|id| id.0).collect();
        self.select_in(
            "workout_exercises",
            &[("select", "exercise_id,workout_id".to_string())],
            "workout_id",
            &ids,
            "workout_id.asc,exercise_id.asc",
        )
        .await
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
