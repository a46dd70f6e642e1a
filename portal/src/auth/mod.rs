//! Authentication module for the login flow and access control.
//!
//! Provides the public interface for authentication-related functionality:
//! login against the PHP backend, session token issuance, and the
//! authorization middleware gating admin console endpoints.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
