//! parley-core
//!
//! Pure domain types, request validation, and storage key conventions.
//! No AWS SDK or HTTP dependency; this is the shared vocabulary of Parley.

pub mod error;
pub mod keys;
pub mod models;
pub mod validation;
