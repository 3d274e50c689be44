use axum::{extract::State, http::StatusCode, Extension};

use crate::{
    db::CacheKey,
    error::{AppError, AppResult},
    middleware::RequestId,
    routes::AppState,
};

/// Drops the cached catalog so the next request reloads it
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    let cache = state
        .catalog_cache
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Catalog cache is not enabled".to_string()))?;

    cache.invalidate(&CacheKey::ExerciseCatalog).await?;
    tracing::info!(request_id = %request_id, "Exercise catalog cache invalidated");

    Ok(StatusCode::NO_CONTENT)
}
