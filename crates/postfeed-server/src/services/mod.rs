//! Business logic services

pub mod imagekit;
pub mod posts;

pub use imagekit::ImageKitGateway;
pub use posts::PostService;
