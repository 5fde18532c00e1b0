//! City collection: anyone may read, authenticated callers may write

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use nyaysetu_core::CityInput;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::City;
use crate::queries::{conflict_or, fetch_city};
use crate::state::AppState;

fn duplicate_name(_: &str) -> String {
    "City with this name already exists.".to_string()
}

/// Handler: GET /api/cities
pub async fn list_cities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<City>>, ApiError> {
    let cities: Vec<City> = sqlx::query_as("SELECT id, name FROM cities ORDER BY name")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(cities))
}

/// Handler: POST /api/cities
pub async fn create_city(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    ApiJson(input): ApiJson<CityInput>,
) -> Result<(StatusCode, Json<City>), ApiError> {
    let name = input.validate()?;

    let city: City = sqlx::query_as("INSERT INTO cities (name) VALUES (?) RETURNING id, name")
        .bind(&name)
        .fetch_one(&state.db)
        .await
        .map_err(|e| conflict_or(e, duplicate_name))?;

    tracing::info!("Created city {} ({})", city.id, city.name);

    Ok((StatusCode::CREATED, Json(city)))
}

/// Handler: GET /api/cities/:id
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<City>, ApiError> {
    Ok(Json(fetch_city(&state.db, id).await?))
}

/// Handler: PUT|PATCH /api/cities/:id
pub async fn update_city(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<CityInput>,
) -> Result<Json<City>, ApiError> {
    let name = input.validate()?;

    let city: Option<City> =
        sqlx::query_as("UPDATE cities SET name = ? WHERE id = ? RETURNING id, name")
            .bind(&name)
            .bind(id)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| conflict_or(e, duplicate_name))?;

    let city = city.ok_or_else(|| ApiError::NotFound(format!("City not found: {}", id)))?;
    tracing::info!("Renamed city {} to {}", city.id, city.name);
    Ok(Json(city))
}

/// Handler: DELETE /api/cities/:id
pub async fn delete_city(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM cities WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("City not found: {}", id)));
    }
    tracing::info!("Deleted city {}", id);
    Ok(StatusCode::NO_CONTENT)
}
