//! Complaints relevant to the cities a lawyer serves

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use nyaysetu_core::CityTokens;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::models::ComplaintBrief;
use crate::queries::{
    city_names_by_id, complaints_in_cities, profile_id_for_account, service_city_names,
};
use crate::state::AppState;

/// Handler: GET /api/lawyers/cases
///
/// Complaints located in any city the caller's profile serves.
pub async fn my_cases(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<ComplaintBrief>>, ApiError> {
    let lawyer_id = profile_id_for_account(&state.db, caller.account_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Lawyer profile required.".to_string()))?;

    let names = service_city_names(&state.db, lawyer_id).await?;
    let cases = complaints_in_cities(&state.db, &names).await?;
    Ok(Json(cases))
}

/// Handler: GET /api/lawyers/search-cases?cities=<ids and names>
pub async fn search_cases(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ComplaintBrief>>, ApiError> {
    let tokens = params
        .get("cities")
        .map(|raw| CityTokens::parse(raw))
        .unwrap_or_default();
    if tokens.is_empty() {
        return Err(no_cities());
    }

    let resolved = city_names_by_id(&state.db, &tokens.ids).await?;
    let names = tokens.into_names(resolved);
    if names.is_empty() {
        return Err(no_cities());
    }

    tracing::debug!("Case search over cities {:?}", names);
    let cases = complaints_in_cities(&state.db, &names).await?;
    Ok(Json(cases))
}

fn no_cities() -> ApiError {
    ApiError::validation("cities", "Provide cities by id or name.")
}
