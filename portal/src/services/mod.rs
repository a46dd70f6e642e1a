//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations against the external PHP content backend, which owns all
//! persistence for the site.

pub mod backend_client;
pub mod content_service;
