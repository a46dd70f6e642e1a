//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Validates the sealed session token the browser sends from its
//! `userSession` slot and enforces the admin gate on console endpoints. A
//! missing, malformed, tampered, or foreign token is treated exactly like
//! being logged out.
//!
//! The [`SessionCodec`] is built once at startup and injected via
//! `Extension`; these functions never touch configuration themselves.

use crate::session::{SessionCodec, UserSession};
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Session token authentication middleware
pub async fn session_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if it's a Bearer token
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    let codec = request
        .extensions()
        .get::<SessionCodec>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    // Any open failure collapses to "no session"
    match codec.open(token) {
        Some(session) if session.authenticated => {
            // Add the session to request extensions for use in handlers
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Optional session authentication middleware (doesn't fail if no token)
pub async fn optional_session_auth(
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let codec = request
        .extensions()
        .get::<SessionCodec>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let session: Option<UserSession> = if let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        if auth_header.starts_with("Bearer ") {
            let token = &auth_header[7..];
            codec.open(token).filter(|session| session.authenticated)
        } else {
            None
        }
    } else {
        None
    };

    // Always insert the Option<UserSession>, even if it's None
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Admin role authorization middleware
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    // Get the session from request extensions (set by session_auth)
    let session = request
        .extensions()
        .get::<UserSession>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if user has admin role
    if !session.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
