//! HTTP handlers for the NyaySetu API

use axum::Json;
use serde::Serialize;

pub mod accounts;
pub mod cases;
pub mod cities;
pub mod complaints;
pub mod contact;
pub mod directory;
pub mod lawyers;
pub mod locations;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "nyaysetu-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}
