//! Libris Catalog Server
//!
//! REST JSON API over a library catalog and its lending history, built on a
//! small query-mapping engine that turns query strings into filtered,
//! keyword-searched and paginated database queries.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
