//! Contact requests from citizens to lawyers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::auth::Caller;
use crate::error::{unique_violation, ApiError};
use crate::extract::OptionalJson;
use crate::models::{ContactBody, ContactRequest, CONTACT_REQUEST_COLUMNS};
use crate::queries::{profile_id_for_account, profile_owner};
use crate::state::AppState;

/// Handler: POST /api/lawyers/:id/contact
///
/// The `(account, lawyer)` UNIQUE constraint decides duplicates; there is no
/// existence pre-check to race against.
pub async fn send_contact_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i64>,
    OptionalJson(body): OptionalJson<ContactBody>,
) -> Result<(StatusCode, Json<ContactRequest>), ApiError> {
    profile_owner(&state.db, id).await?;

    let message = body.message.unwrap_or_default();

    let sql = format!(
        r#"
        INSERT INTO contact_requests (account_id, lawyer_id, message, status, created_at)
        VALUES (?, ?, ?, 'pending', ?)
        RETURNING {}
        "#,
        CONTACT_REQUEST_COLUMNS
    );
    let request: ContactRequest = sqlx::query_as(&sql)
        .bind(caller.account_id)
        .bind(id)
        .bind(&message)
        .bind(Utc::now())
        .fetch_one(&state.db)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => {
                tracing::warn!(
                    "Account {} already contacted lawyer profile {}",
                    caller.account_id,
                    id
                );
                ApiError::AlreadySent
            }
            None => ApiError::Database(e),
        })?;

    tracing::info!(
        "Contact request {} from account {} to lawyer profile {}",
        request.id,
        caller.account_id,
        id
    );

    Ok((StatusCode::CREATED, Json(request)))
}

/// Handler: GET /api/lawyers/me/contact-requests
pub async fn my_contact_requests(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<ContactRequest>>, ApiError> {
    let lawyer_id = profile_id_for_account(&state.db, caller.account_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Lawyer profile required.".to_string()))?;

    let sql = format!(
        "SELECT {} FROM contact_requests WHERE lawyer_id = ? ORDER BY created_at DESC, id DESC",
        CONTACT_REQUEST_COLUMNS
    );
    let requests: Vec<ContactRequest> = sqlx::query_as(&sql)
        .bind(lawyer_id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(requests))
}
