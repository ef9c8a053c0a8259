//! Postfeed Core Library
//!
//! Error taxonomy, port traits and write validation for the post service.

// Re-export pure types from postfeed-types
pub use postfeed_types::*;

pub mod error;
pub mod ports;
pub mod validation;

pub use error::{PostError, Result};
pub use validation::validate_new_post;
