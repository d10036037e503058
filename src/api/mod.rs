//! REST API layer

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;

pub use error::ApiError;
pub use router::create_api_router;
