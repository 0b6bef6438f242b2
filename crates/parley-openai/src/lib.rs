//! parley-openai
//!
//! Remote completion and image-generation calls, the capability
//! declarations sent with each turn, and the parsing of what comes back.

pub mod capabilities;
pub mod client;
pub mod completion;
pub mod config;
pub mod error;
pub mod image;

use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
