//! Routes for the content collections.

use crate::api::content::handlers::*;
use crate::auth::middleware::{admin_auth, optional_session_auth, session_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Public read-only routes backing the marketing/informational pages.
/// Sessions are resolved when present so handlers can tailor responses,
/// but none is required.
pub fn content_router() -> Router {
    Router::new()
        .route("/{kind}", get(list))
        .route("/{kind}/{id}", get(fetch_one))
        .layer(middleware::from_fn(optional_session_auth))
}

/// Mutating routes for the admin console, gated on an authenticated admin
/// session.
pub fn admin_content_router() -> Router {
    Router::new()
        .route("/{kind}", post(create))
        .route("/{kind}/{id}", put(update).delete(remove))
        .layer(middleware::from_fn(admin_auth))
        .layer(middleware::from_fn(session_auth))
}
