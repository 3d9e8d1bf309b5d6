//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: Groq inference,
//! WhatsApp and SMTP notification transports, SQLite and in-memory profile
//! stores, plus configuration loading, retry and tracing setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, EmailAppConfig, Environment, NotificationsConfig, RetryAppConfig,
    ServerConfig, TaggingConfig, WhatsAppAppConfig,
};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteCustomerProfileStore, create_pool,
};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_tracing};
