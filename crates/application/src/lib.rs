//! Application layer - Use cases and orchestration
//!
//! Contains the tagging pipeline (urgency detection, classifier adapters,
//! fallback selection), the notification dispatcher and the port
//! definitions implemented by the infrastructure layer.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
