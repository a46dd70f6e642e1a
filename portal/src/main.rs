//! Main entry point for the COC Library portal.
//!
//! This file initializes the Axum web server, builds the shared client for
//! the external PHP content backend, and registers all API routes and
//! middleware. It orchestrates the application's startup and defines its
//! overall structure.

mod api;
mod auth;
mod catalog;
mod config;
mod errors;
mod services;
mod session;
mod utils;

use crate::api::common::ApiResponse;
use crate::services::backend_client::BackendClient;
use crate::session::SessionCodec;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let backend = BackendClient::new(&config).unwrap();
    let codec = SessionCodec::new().unwrap();

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/content", api::content::routes::content_router())
        .nest(
            "/api/admin/content",
            api::content::routes::admin_content_router(),
        )
        .nest("/api/catalog", api::catalog::routes::catalog_router())
        .layer(Extension(backend))
        .layer(Extension(codec));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting portal server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "COC Library Portal",
            "version": "0.1.0"
        }),
        "Welcome to the COC Library portal API",
    ))
}
