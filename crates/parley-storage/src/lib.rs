//! parley-storage
//!
//! The project/chat store: a dyn-compatible [`store::ProjectStore`] trait
//! with an S3-backed implementation and an in-process one.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;
