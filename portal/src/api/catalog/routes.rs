//! Routes for catalog deep-link generation and inspection.

use crate::api::catalog::handlers::*;
use crate::auth::middleware::{admin_auth, session_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn catalog_router() -> Router {
    Router::new()
        .route("/deep-link/{bib_id}", get(deep_link))
        .route("/book/{id}/deep-link", get(book_deep_link))
        .route(
            "/inspect",
            post(inspect)
                .layer(middleware::from_fn(admin_auth))
                .layer(middleware::from_fn(session_auth)),
        )
}
