//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user login, logout, and the authenticated-user query.
//! They are designed to be integrated into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(session_auth)))
}
