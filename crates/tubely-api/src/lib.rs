//! Tubely API Library
//!
//! HTTP surface for video thumbnail uploads: bearer authentication, multipart
//! validation, the upload coordinator and application setup.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
pub mod validation;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::thumbnail::ThumbnailUploadService;
pub use state::AppState;
