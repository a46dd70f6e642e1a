//! HTTP API surface of the portal.

pub mod catalog;
pub mod common;
pub mod content;
