//! Caller identity
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! account id in the `X-Account-Id` header. Handlers that need a caller take
//! a [`Caller`] argument, which also confirms the account still exists.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Authenticated account making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub account_id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(ACCOUNT_HEADER).ok_or_else(|| {
            ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
        })?;

        let account_id: i64 = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| ApiError::Unauthorized("Malformed account id.".to_string()))?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_optional(&state.db)
            .await?;

        found
            .map(|account_id| Caller { account_id })
            .ok_or_else(|| ApiError::Unauthorized("Unknown account.".to_string()))
    }
}
