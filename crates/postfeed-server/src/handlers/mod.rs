//! HTTP handlers

pub mod feed;
pub mod health;
pub mod posts;
pub mod upload;

pub use health::{health, hello_world};
