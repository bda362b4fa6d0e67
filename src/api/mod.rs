//! API handlers for the Biblio REST endpoints

pub mod field_definitions;
pub mod health;
pub mod openapi;
pub mod records;
pub mod templates;
pub mod unimarc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// `/api/v1` routes, without documentation or middleware
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Field definition catalog
        .route("/field-definitions/control", get(field_definitions::list_control_fields))
        .route("/field-definitions/control/:tag", get(field_definitions::get_control_field))
        .route("/field-definitions/data", get(field_definitions::list_data_fields))
        .route("/field-definitions/data/:tag", get(field_definitions::get_data_field))
        // Templates
        .route(
            "/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/templates/:id", get(templates::get_template))
        .route("/templates/:id/scaffold", get(templates::scaffold_record))
        // Records
        .route("/records", get(records::list_records).post(records::create_record))
        .route("/records/validate", post(records::validate_record))
        .route("/records/validate-field", post(records::validate_field))
        .route("/records/:id", get(records::get_record))
        .route("/records/:id/summary", get(records::get_record_summary))
        .route("/records/:id/display", get(records::get_record_display))
        // Raw metadata
        .route("/unimarc/extract", post(unimarc::extract))
        .with_state(state)
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes(state))
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
