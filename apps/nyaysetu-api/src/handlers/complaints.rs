//! Complaint intake and the submitter's own view of it

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use nyaysetu_core::{ComplaintInput, LocationLink};
use sqlx::SqliteConnection;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::handlers::locations::{insert_incident_location, insert_residential};
use crate::models::{ComplaintResponse, DbComplaint, COMPLAINT_COLUMNS};
use crate::state::AppState;

/// Handler: POST /api/complaints
///
/// Location records are created or linked, then the complaint is inserted,
/// all inside one transaction.
pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(input): ApiJson<ComplaintInput>,
) -> Result<(StatusCode, Json<ComplaintResponse>), ApiError> {
    let new = input.validate()?;

    let mut tx = state.db.begin().await?;

    let residential_id = match &new.residential_address {
        LocationLink::None => None,
        LocationLink::Existing(id) => {
            Some(ensure_exists(&mut tx, "residentials", "residential_address_id", *id).await?)
        }
        LocationLink::Create(r) => Some(insert_residential(&mut tx, r).await?.id),
    };
    let incident_id = match &new.incident_location {
        LocationLink::None => None,
        LocationLink::Existing(id) => {
            Some(ensure_exists(&mut tx, "incident_locations", "incident_location_id", *id).await?)
        }
        LocationLink::Create(l) => Some(insert_incident_location(&mut tx, l).await?.id),
    };

    let sql = format!(
        r#"
        INSERT INTO complaints (
            account_id, full_name, contact_number, govt_id, dob, title, description,
            incident_datetime, residential_address_id, incident_location_id, photo,
            file_of_complaint, witness_name, witness_contact, privacy_option, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        COMPLAINT_COLUMNS
    );
    let complaint: DbComplaint = sqlx::query_as(&sql)
        .bind(caller.account_id)
        .bind(&new.full_name)
        .bind(&new.contact_number)
        .bind(&new.govt_id)
        .bind(new.dob)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.incident_datetime)
        .bind(residential_id)
        .bind(incident_id)
        .bind(&new.photo)
        .bind(&new.file_of_complaint)
        .bind(&new.witness_name)
        .bind(&new.witness_contact)
        .bind(new.privacy_option.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Account {} filed complaint {} ({})",
        caller.account_id,
        complaint.id,
        new.privacy_option
    );

    Ok((StatusCode::CREATED, Json(complaint.try_into()?)))
}

/// Handler: GET /api/complaints
pub async fn list_my_complaints(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    let sql = format!(
        "SELECT {} FROM complaints WHERE account_id = ? ORDER BY created_at DESC, id DESC",
        COMPLAINT_COLUMNS
    );
    let rows: Vec<DbComplaint> = sqlx::query_as(&sql)
        .bind(caller.account_id)
        .fetch_all(&state.db)
        .await?;

    let complaints = rows
        .into_iter()
        .map(ComplaintResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(complaints))
}

/// Handler: GET /api/complaints/:id
///
/// Only the submitter sees the full record.
pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let sql = format!("SELECT {} FROM complaints WHERE id = ?", COMPLAINT_COLUMNS);
    let complaint: Option<DbComplaint> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    let complaint =
        complaint.ok_or_else(|| ApiError::NotFound(format!("Complaint not found: {}", id)))?;
    if complaint.account_id != caller.account_id {
        return Err(ApiError::not_owner());
    }
    Ok(Json(complaint.try_into()?))
}

async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &str,
    field: &str,
    id: i64,
) -> Result<i64, ApiError> {
    let sql = format!("SELECT id FROM {} WHERE id = ?", table);
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    found.ok_or_else(|| {
        ApiError::validation(
            field,
            format!("Invalid pk \"{}\" - object does not exist.", id),
        )
    })
}
