//! Filestash Infrastructure Library
//!
//! Cross-cutting concerns shared by the service binaries: tracing setup and
//! HTTP middleware.

pub mod middleware;
pub mod telemetry;

pub use middleware::request_id::{get_request_id, request_id_middleware, RequestId};
pub use telemetry::init_telemetry;
