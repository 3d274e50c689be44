use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Json,
};
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::RecommendationResult,
    routes::AppState,
};

/// Bucketed workout recommendations for one user
pub async fn workout_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RecommendationResult>> {
    let user_id = parse_user_id(&user_id)?;
    tracing::info!(request_id = %request_id, user_id = %user_id, "Recommendation request");

    let mut rng = StdRng::from_entropy();
    let result = state
        .recommender
        .recommend(user_id, Utc::now(), &mut rng)
        .await?;

    Ok(Json(result))
}

/// Old single-list endpoint, now served by the bucketed one
pub async fn legacy_recommendations(Path(user_id): Path<String>) -> AppResult<Redirect> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Redirect::permanent(&format!(
        "/api/v1/workout-recommendations/{}",
        user_id
    )))
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput("User ID is required".to_string()));
    }

    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("Invalid user ID: {}", raw)))
}
