//! Directory search and listings

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use nyaysetu_core::{specialization_entries, DirectoryFilter, SpecializationEntry};

use crate::error::ApiError;
use crate::models::LawyerProfileResponse;
use crate::queries::{search_profiles, DirectoryOrder};
use crate::state::AppState;

/// Handler: GET /api/lawyers
///
/// Optional filters: `specialization`, `city` (id or name), `min_experience`
/// and free-text `q`.
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LawyerProfileResponse>>, ApiError> {
    let filter = DirectoryFilter::from_params(&params)?;
    if !filter.is_empty() {
        tracing::debug!("Directory search: {:?}", filter);
    }
    let profiles = search_profiles(&state.db, &filter, DirectoryOrder::Default).await?;
    Ok(Json(profiles))
}

/// Handler: GET /api/lawyers/top
pub async fn top_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LawyerProfileResponse>>, ApiError> {
    let filter = DirectoryFilter::from_params(&params)?;
    let profiles = search_profiles(&state.db, &filter, DirectoryOrder::Top).await?;
    Ok(Json(profiles))
}

/// Handler: GET /api/lawyers/specializations
pub async fn list_specializations() -> Json<Vec<SpecializationEntry>> {
    Json(specialization_entries())
}
