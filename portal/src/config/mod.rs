//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the PHP backend base URL, server port, and the session token passphrase.

use anyhow::{Context, Result};
use std::env;

/// Fallback passphrase for the session token cipher.
///
/// This reproduces the fixed client-bundled constant of the original front
/// end. It exists to make casual inspection of the stored `userSession` slot
/// non-trivial; it is obfuscation, not an access-control boundary, and must
/// not be relied on against anyone with access to this code.
pub const DEFAULT_SESSION_KEY: &str = "phinma-coc-lrc-userSession";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_api_url: String,
    pub backend_timeout_seconds: u64,
    pub session_key: String,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend_api_url = env::var("BACKEND_API_URL").context("BACKEND_API_URL not set")?;

        let backend_timeout_seconds = env::var("BACKEND_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("BACKEND_TIMEOUT_SECONDS must be a valid number")?;

        let session_key =
            env::var("SESSION_KEY").unwrap_or_else(|_| DEFAULT_SESSION_KEY.to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            backend_api_url,
            backend_timeout_seconds,
            session_key,
            server_port,
        })
    }
}
