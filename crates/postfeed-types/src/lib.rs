//! Postfeed Types - Pure type definitions
//!
//! This crate contains only pure data types with no async runtime dependencies,
//! shared between the core ports and the HTTP server.

pub mod api;
pub mod post;

pub use api::*;
pub use post::*;
