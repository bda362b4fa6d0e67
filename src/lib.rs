//! Biblio server
//!
//! REST API around a UNIMARC bibliographic core: field definition catalog,
//! record templates, schema validation of records and summary extraction
//! from UNIMARC or Dublin Core metadata.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod unimarc;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
