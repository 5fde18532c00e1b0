//! Account registration and removal

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use nyaysetu_core::AccountInput;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::Account;
use crate::queries::conflict_or;
use crate::state::AppState;

/// Handler: POST /api/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<AccountInput>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let new = input.validate()?;

    let account: Account = sqlx::query_as(
        r#"
        INSERT INTO accounts (username, first_name, last_name, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, first_name, last_name, created_at
        "#,
    )
    .bind(&new.username)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_or(e, |_| "A user with that username already exists.".to_string()))?;

    tracing::info!("Created account {} ({})", account.id, account.username);

    Ok((StatusCode::CREATED, Json(account)))
}

/// Handler: GET /api/accounts/me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Account>, ApiError> {
    let account: Account = sqlx::query_as(
        "SELECT id, username, first_name, last_name, created_at FROM accounts WHERE id = ?",
    )
    .bind(caller.account_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(account))
}

/// Handler: DELETE /api/accounts/me
///
/// Complaints, the lawyer profile, its city links and contact requests go
/// with the account through foreign-key cascades.
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(caller.account_id)
        .execute(&state.db)
        .await?;

    tracing::info!("Deleted account {}", caller.account_id);

    Ok(StatusCode::NO_CONTENT)
}
