//! parley-chat
//!
//! The project-chat turn pipeline:
//!
//! ```text
//! validate → load context → declare capabilities → complete
//!          → resolve image (if requested) → commit → result
//! ```
//!
//! Validation and context failures exit before any remote call. Completion
//! and image-API failures abort the turn with nothing persisted. Failures
//! while committing are logged and never change the result.

pub mod commit;
pub mod context;
pub mod error;
pub mod projects;
pub mod resolve;
pub mod turn;
