//! Libris Server - library catalog and lending API

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let repository = Repository::new(pool);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static("x-total-count"),
            HeaderName::from_static("x-total-pages"),
        ]);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books
        .route("/books", get(api::books::search_books_advanced).post(api::books::create_book))
        .route("/books/all", get(api::books::list_books))
        .route("/books/paginated", get(api::books::list_books_paginated))
        .route("/books/search", get(api::books::search_books))
        .route("/books/search/relations", get(api::books::search_books_with_relations))
        .route("/books/:id", get(api::books::get_book))
        // Lending history
        .route("/histories", get(api::borrow_items::list_histories).post(api::borrow_items::create_history))
        .route("/histories/paginated", get(api::borrow_items::list_histories_paginated))
        .route("/histories/unreturned", get(api::borrow_items::list_unreturned))
        .route("/histories/due-date", get(api::borrow_items::list_due_on))
        .route("/histories/due-date-unreturned", get(api::borrow_items::list_due_on_unreturned))
        .route("/histories/search", get(api::borrow_items::search_histories))
        .route("/histories/:id/return", post(api::borrow_items::return_item))
        // Members
        .route("/members", get(api::members::list_members).post(api::members::create_member))
        .route("/members/paginated", get(api::members::list_members_paginated))
        .route("/members/search", get(api::members::search_members))
        .route("/members/by-name", get(api::members::find_by_name))
        .route("/members/by-code", get(api::members::find_by_code))
        // Authors
        .route("/authors", get(api::authors::list_authors).post(api::authors::create_author))
        .route("/authors/search", get(api::authors::search_authors))
        // Transactions
        .route("/transactions", post(api::transactions::create_transaction))
        .route("/transactions/:id", get(api::transactions::get_transaction))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
