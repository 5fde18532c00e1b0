//! Residential addresses and incident locations
//!
//! Deleting either nulls the reference on complaints that point at it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use nyaysetu_core::{IncidentLocationInput, NewIncidentLocation, NewResidential, ResidentialInput};
use sqlx::SqliteConnection;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::{IncidentLocation, Residential};
use crate::state::AppState;

pub(crate) async fn insert_residential(
    conn: &mut SqliteConnection,
    r: &NewResidential,
) -> Result<Residential, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO residentials (house_number, landmark, city, state, pincode)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, house_number, landmark, city, state, pincode
        "#,
    )
    .bind(&r.house_number)
    .bind(&r.landmark)
    .bind(&r.city)
    .bind(&r.state)
    .bind(&r.pincode)
    .fetch_one(&mut *conn)
    .await
}

pub(crate) async fn insert_incident_location(
    conn: &mut SqliteConnection,
    l: &NewIncidentLocation,
) -> Result<IncidentLocation, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO incident_locations (city, state, location, landmark)
        VALUES (?, ?, ?, ?)
        RETURNING id, city, state, location, landmark
        "#,
    )
    .bind(&l.city)
    .bind(&l.state)
    .bind(&l.location)
    .bind(&l.landmark)
    .fetch_one(&mut *conn)
    .await
}

/// Handler: POST /api/residentials
pub async fn create_residential(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    ApiJson(input): ApiJson<ResidentialInput>,
) -> Result<(StatusCode, Json<Residential>), ApiError> {
    let new = input.validate()?;
    let mut conn = state.db.acquire().await?;
    let residential = insert_residential(&mut conn, &new).await?;
    Ok((StatusCode::CREATED, Json(residential)))
}

/// Handler: GET /api/residentials/:id
pub async fn get_residential(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Residential>, ApiError> {
    let residential: Option<Residential> = sqlx::query_as(
        "SELECT id, house_number, landmark, city, state, pincode FROM residentials WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    residential
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Residential address not found: {}", id)))
}

/// Handler: DELETE /api/residentials/:id
pub async fn delete_residential(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM residentials WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "Residential address not found: {}",
            id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler: POST /api/incident-locations
pub async fn create_incident_location(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    ApiJson(input): ApiJson<IncidentLocationInput>,
) -> Result<(StatusCode, Json<IncidentLocation>), ApiError> {
    let new = input.validate()?;
    let mut conn = state.db.acquire().await?;
    let location = insert_incident_location(&mut conn, &new).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// Handler: GET /api/incident-locations/:id
pub async fn get_incident_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<IncidentLocation>, ApiError> {
    let location: Option<IncidentLocation> = sqlx::query_as(
        "SELECT id, city, state, location, landmark FROM incident_locations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    location
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Incident location not found: {}", id)))
}

/// Handler: DELETE /api/incident-locations/:id
pub async fn delete_incident_location(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM incident_locations WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "Incident location not found: {}",
            id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
