//! Lawyer profile lifecycle
//!
//! One profile per account: the application checks first so the caller gets
//! a clear message, and the UNIQUE index on `account_id` settles any race
//! between concurrent creates.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use nyaysetu_core::{
    parse_id, parse_won_flag, win_rate, LawyerProfileInput, ProfileChanges, WriteMode,
    MAX_SERVICE_CITIES,
};
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::{ApiJson, OptionalJson};
use crate::models::*;
use crate::queries::{
    conflict_or, fetch_city, fetch_profile, fetch_profile_on, profile_id_for_account, profile_owner,
    set_service_cities,
};
use crate::state::AppState;

const PROFILE_EXISTS: &str = "Profile already exists for this user.";

fn profile_conflict(message: &str) -> String {
    if message.contains("license_number") {
        "Lawyer profile with this license number already exists.".to_string()
    } else {
        PROFILE_EXISTS.to_string()
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Lawyer profile not found: {}", id))
}

/// Insert a profile for `account_id` and set its cities, in one transaction.
async fn insert_profile(
    state: &AppState,
    account_id: i64,
    changes: ProfileChanges,
) -> Result<LawyerProfileResponse, ApiError> {
    if profile_id_for_account(&state.db, account_id).await?.is_some() {
        tracing::warn!("Account {} already owns a lawyer profile", account_id);
        return Err(ApiError::Conflict(PROFILE_EXISTS.to_string()));
    }

    let mut tx = state.db.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO lawyer_profiles (
            account_id, specialization, experience_years, license_number,
            bio, contact_number, address, rating
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(account_id)
    .bind(changes.specialization.unwrap_or_default().key())
    .bind(changes.experience_years.unwrap_or(0))
    .bind(changes.license_number.as_deref().unwrap_or_default())
    .bind(changes.bio.clone().flatten())
    .bind(changes.contact_number.clone().flatten())
    .bind(changes.address.clone().flatten())
    .bind(changes.rating.unwrap_or(0.0))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| conflict_or(e, profile_conflict))?;

    if let Some(city_ids) = &changes.service_city_ids {
        set_service_cities(&mut tx, id, city_ids).await?;
    }

    let profile = fetch_profile_on(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!("Created lawyer profile {} for account {}", id, account_id);
    Ok(profile)
}

/// Apply validated changes to an existing profile, in one transaction.
async fn apply_changes(
    state: &AppState,
    id: i64,
    changes: ProfileChanges,
) -> Result<LawyerProfileResponse, ApiError> {
    let mut tx = state.db.begin().await?;

    update_columns(&mut tx, id, &changes).await?;
    if let Some(city_ids) = &changes.service_city_ids {
        set_service_cities(&mut tx, id, city_ids).await?;
    }

    let profile = fetch_profile_on(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!("Updated lawyer profile {}", id);
    Ok(profile)
}

async fn update_columns(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &ProfileChanges,
) -> Result<(), ApiError> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE lawyer_profiles SET ");
    let mut any = false;
    {
        let mut set = qb.separated(", ");
        if let Some(spec) = changes.specialization {
            set.push("specialization = ").push_bind_unseparated(spec.key());
            any = true;
        }
        if let Some(years) = changes.experience_years {
            set.push("experience_years = ").push_bind_unseparated(years);
            any = true;
        }
        if let Some(license) = &changes.license_number {
            set.push("license_number = ").push_bind_unseparated(license.clone());
            any = true;
        }
        if let Some(bio) = &changes.bio {
            set.push("bio = ").push_bind_unseparated(bio.clone());
            any = true;
        }
        if let Some(contact) = &changes.contact_number {
            set.push("contact_number = ").push_bind_unseparated(contact.clone());
            any = true;
        }
        if let Some(address) = &changes.address {
            set.push("address = ").push_bind_unseparated(address.clone());
            any = true;
        }
        if let Some(rating) = changes.rating {
            set.push("rating = ").push_bind_unseparated(rating);
            any = true;
        }
    }
    if !any {
        return Ok(());
    }
    qb.push(" WHERE id = ").push_bind(id);

    qb.build()
        .execute(&mut *conn)
        .await
        .map_err(|e| conflict_or(e, profile_conflict))?;
    Ok(())
}

/// Handler: POST /api/lawyers
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(input): ApiJson<LawyerProfileInput>,
) -> Result<(StatusCode, Json<LawyerProfileResponse>), ApiError> {
    let changes = input.validate(WriteMode::Create)?;
    let profile = insert_profile(&state, caller.account_id, changes).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Handler: GET /api/lawyers/:id
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<LawyerProfileResponse>, ApiError> {
    fetch_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Handler: PUT|PATCH /api/lawyers/:id
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    method: Method,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<LawyerProfileInput>,
) -> Result<Json<LawyerProfileResponse>, ApiError> {
    if profile_owner(&state.db, id).await? != caller.account_id {
        return Err(ApiError::not_owner());
    }
    let changes = input.validate(write_mode(&method))?;
    Ok(Json(apply_changes(&state, id, changes).await?))
}

/// Handler: DELETE /api/lawyers/:id
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if profile_owner(&state.db, id).await? != caller.account_id {
        return Err(ApiError::not_owner());
    }
    sqlx::query("DELETE FROM lawyer_profiles WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    tracing::info!("Deleted lawyer profile {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler: GET /api/lawyers/me
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<LawyerProfileResponse>, ApiError> {
    let id = profile_id_for_account(&state.db, caller.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found.".to_string()))?;
    fetch_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Handler: PUT|PATCH /api/lawyers/me
///
/// Updates the caller's profile, or creates it from the payload when the
/// caller has none yet.
pub async fn upsert_my_profile(
    State(state): State<Arc<AppState>>,
    method: Method,
    caller: Caller,
    ApiJson(input): ApiJson<LawyerProfileInput>,
) -> Result<Response, ApiError> {
    match profile_id_for_account(&state.db, caller.account_id).await? {
        Some(id) => {
            let changes = input.validate(write_mode(&method))?;
            let profile = apply_changes(&state, id, changes).await?;
            Ok(Json(profile).into_response())
        }
        None => {
            let changes = input.validate(WriteMode::Create)?;
            let profile = insert_profile(&state, caller.account_id, changes).await?;
            Ok((StatusCode::CREATED, Json(profile)).into_response())
        }
    }
}

fn write_mode(method: &Method) -> WriteMode {
    if method == Method::PATCH {
        WriteMode::Partial
    } else {
        WriteMode::Replace
    }
}

/// Handler: POST /api/lawyers/:id/add-city
///
/// Adding a city the profile already serves is a no-op.
pub async fn add_city(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(body): ApiJson<CityActionRequest>,
) -> Result<Json<CityActionResponse>, ApiError> {
    let city_id = parse_id("city_id", body.city_id.as_ref())?;
    let owner = profile_owner(&state.db, id).await?;
    state.authorize_profile_action(&caller, owner)?;
    let city = fetch_city(&state.db, city_id).await?;

    // Ceiling check and insert are a single statement.
    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO lawyer_service_cities (lawyer_id, city_id)
        SELECT ?, ?
        WHERE (SELECT COUNT(*) FROM lawyer_service_cities WHERE lawyer_id = ?) < ?
        "#,
    )
    .bind(id)
    .bind(city.id)
    .bind(id)
    .bind(MAX_SERVICE_CITIES as i64)
    .execute(&state.db)
    .await?
    .rows_affected();

    if inserted == 0 {
        let linked: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM lawyer_service_cities WHERE lawyer_id = ? AND city_id = ?",
        )
        .bind(id)
        .bind(city.id)
        .fetch_optional(&state.db)
        .await?;

        if linked.is_none() {
            return Err(ApiError::validation(
                "city_id",
                format!("You can select up to {} cities.", MAX_SERVICE_CITIES),
            ));
        }
    }

    tracing::info!("Lawyer profile {} serves city {}", id, city.name);
    Ok(Json(CityActionResponse {
        status: "added",
        city,
    }))
}

/// Handler: POST /api/lawyers/:id/remove-city
///
/// Removing a city the profile does not serve is a no-op.
pub async fn remove_city(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(body): ApiJson<CityActionRequest>,
) -> Result<Json<CityActionResponse>, ApiError> {
    let city_id = parse_id("city_id", body.city_id.as_ref())?;
    let owner = profile_owner(&state.db, id).await?;
    state.authorize_profile_action(&caller, owner)?;
    let city = fetch_city(&state.db, city_id).await?;

    sqlx::query("DELETE FROM lawyer_service_cities WHERE lawyer_id = ? AND city_id = ?")
        .bind(id)
        .bind(city.id)
        .execute(&state.db)
        .await?;

    tracing::info!("Lawyer profile {} no longer serves city {}", id, city.name);
    Ok(Json(CityActionResponse {
        status: "removed",
        city,
    }))
}

/// Handler: POST /api/lawyers/:id/increment-cases
///
/// Both counters move in a single UPDATE, so concurrent calls never lose an
/// increment.
pub async fn increment_cases(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
    OptionalJson(body): OptionalJson<IncrementCasesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner = profile_owner(&state.db, id).await?;
    state.authorize_profile_action(&caller, owner)?;

    let won = parse_won_flag(body.won.as_ref());

    let counters: Option<CaseCounters> = sqlx::query_as(
        r#"
        UPDATE lawyer_profiles
        SET total_cases = total_cases + 1, won_cases = won_cases + ?
        WHERE id = ?
        RETURNING total_cases, won_cases
        "#,
    )
    .bind(i64::from(won))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let counters = counters.ok_or_else(|| not_found(id))?;
    tracing::info!(
        "Lawyer profile {} recorded a case (won: {}), now {}/{}",
        id,
        won,
        counters.won_cases,
        counters.total_cases
    );

    Ok(Json(json!({
        "total_cases": counters.total_cases,
        "won_cases": counters.won_cases,
        "win_rate": win_rate(counters.won_cases, counters.total_cases),
    })))
}
