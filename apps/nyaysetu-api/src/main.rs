//! NyaySetu API Server - citizen complaints and lawyer directory
//!
//! Provides REST endpoints for:
//! - Complaint filing with residential and incident locations
//! - Lawyer profiles, service cities and case outcomes
//! - Directory search and top listings
//! - Contact requests from citizens to lawyers
//! - Case search across the cities a lawyer serves
//!
//! Authentication is handled by the gateway in front of this service; see
//! [`auth`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod queries;
mod state;
#[cfg(test)]
mod tests;

use config::Config;
use handlers::{accounts, cases, cities, complaints, contact, directory, lawyers, locations};
use state::AppState;

/// Build the full router over shared state
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Accounts
        .route("/api/accounts", post(accounts::create_account))
        .route(
            "/api/accounts/me",
            get(accounts::get_me).delete(accounts::delete_me),
        )
        // Cities
        .route(
            "/api/cities",
            get(cities::list_cities).post(cities::create_city),
        )
        .route(
            "/api/cities/:id",
            get(cities::get_city)
                .put(cities::update_city)
                .patch(cities::update_city)
                .delete(cities::delete_city),
        )
        // Location records
        .route("/api/residentials", post(locations::create_residential))
        .route(
            "/api/residentials/:id",
            get(locations::get_residential).delete(locations::delete_residential),
        )
        .route(
            "/api/incident-locations",
            post(locations::create_incident_location),
        )
        .route(
            "/api/incident-locations/:id",
            get(locations::get_incident_location).delete(locations::delete_incident_location),
        )
        // Complaints
        .route(
            "/api/complaints",
            get(complaints::list_my_complaints).post(complaints::create_complaint),
        )
        .route("/api/complaints/:id", get(complaints::get_complaint))
        // Lawyer directory
        .route(
            "/api/lawyers",
            get(directory::list_profiles).post(lawyers::create_profile),
        )
        .route(
            "/api/lawyers/specializations",
            get(directory::list_specializations),
        )
        .route("/api/lawyers/top", get(directory::top_profiles))
        .route(
            "/api/lawyers/me",
            get(lawyers::get_my_profile)
                .put(lawyers::upsert_my_profile)
                .patch(lawyers::upsert_my_profile),
        )
        .route(
            "/api/lawyers/me/contact-requests",
            get(contact::my_contact_requests),
        )
        .route("/api/lawyers/cases", get(cases::my_cases))
        .route("/api/lawyers/search-cases", get(cases::search_cases))
        .route(
            "/api/lawyers/:id",
            get(lawyers::get_profile)
                .put(lawyers::update_profile)
                .patch(lawyers::update_profile)
                .delete(lawyers::delete_profile),
        )
        .route("/api/lawyers/:id/add-city", post(lawyers::add_city))
        .route("/api/lawyers/:id/remove-city", post(lawyers::remove_city))
        .route(
            "/api/lawyers/:id/increment-cases",
            post(lawyers::increment_cases),
        )
        .route("/api/lawyers/:id/contact", post(contact::send_contact_request))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // Initialize tracing
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("nyaysetu_api={}", log_level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize application state
    info!("Initializing NyaySetu API...");
    let state = Arc::new(AppState::new(&config).await?);
    info!("Profile actions policy: {:?}", config.profile_actions);

    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting NyaySetu API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
