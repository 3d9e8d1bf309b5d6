//! Smart tagging HTTP presentation layer
//!
//! axum router, handlers and startup wiring for the smart tagging API.

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use bootstrap::build_state;
pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::create_router;
pub use state::AppState;
