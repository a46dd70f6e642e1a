//! Collection of general utility functions shared across modules.

pub mod crypto;
