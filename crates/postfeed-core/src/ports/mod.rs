//! Port traits (interfaces) for dependency injection

pub mod storage;
pub mod upload;

pub use storage::PostStore;
pub use upload::UploadGateway;
