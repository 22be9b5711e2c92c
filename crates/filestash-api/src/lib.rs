//! Filestash API Library
//!
//! This crate provides the HTTP handlers, application state and startup code
//! for the file storage service.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
