//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `notifications`: staff recipients, WhatsApp and SMTP channels
//! - `resilience`: retry policy for external calls
//! - `tagging`: fallback confidence and history size
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `SMARTTAGS__*` environment variables (`__` separates sections, e.g.
//! `SMARTTAGS__SERVER__PORT=8080`). `GROQ_API_KEY` and `GROQ_MODEL` are read
//! as fallbacks for the inference credential and model.

mod database;
mod notifications;
mod resilience;
mod server;
mod tagging;

use ai_core::InferenceConfig;
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

pub use database::DatabaseConfig;
pub use notifications::{EmailAppConfig, NotificationsConfig, WhatsAppAppConfig};
pub use resilience::RetryAppConfig;
pub use server::ServerConfig;
pub use tagging::TaggingConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SMARTTAGS";

/// Application environment (development or production)
///
/// Controls CORS strictness and error detail in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - permissive CORS, detailed errors
    #[default]
    Development,
    /// Production environment - configured origins, sanitized errors
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference provider used by the classifier
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Retry policy for inference calls
    #[serde(default)]
    pub retry: RetryAppConfig,

    /// Customer profile persistence (absent = in-memory store)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Urgent alert channels
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Tagging pipeline settings
    #[serde(default)]
    pub tagging: TaggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional) and the environment
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables (e.g., SMARTTAGS__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Fill the inference credential and model from provider-specific variables
    ///
    /// Explicit configuration wins: the key is only taken when none is set,
    /// and the model only replaces the built-in default.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.inference.api_key.is_none() {
            if let Some(key) = non_empty("GROQ_API_KEY") {
                debug!("Using GROQ_API_KEY for inference credential");
                self.inference.api_key = Some(SecretString::from(key));
            }
        }

        if self.inference.default_model == InferenceConfig::default().default_model {
            if let Some(model) = non_empty("GROQ_MODEL") {
                self.inference.default_model = model;
            }
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Whether the network classifier can be used
    pub const fn classifier_enabled(&self) -> bool {
        self.inference.has_api_key()
    }

    /// Non-fatal configuration problems worth logging at startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.classifier_enabled() {
            warnings.push(
                "No inference API key configured; tagging runs on the deterministic fallback only"
                    .to_string(),
            );
        }

        if self.is_production()
            && self.server.cors_enabled
            && self.server.allowed_origins.is_empty()
        {
            warnings
                .push("Production mode without allowed_origins; CORS will reject browsers".to_string());
        }

        if !(0.0..=1.0).contains(&self.tagging.fallback_confidence) {
            warnings.push(format!(
                "tagging.fallback_confidence {} is outside [0, 1] and will be clamped",
                self.tagging.fallback_confidence
            ));
        }

        let notifications = &self.notifications;
        if notifications.staff_phone.is_some()
            && notifications
                .whatsapp
                .as_ref()
                .and_then(WhatsAppAppConfig::to_client_config)
                .is_none()
        {
            warnings.push(
                "staff_phone is set but the WhatsApp channel is not configured".to_string(),
            );
        }
        if notifications.staff_email.is_some() && notifications.email.is_none() {
            warnings.push("staff_email is set but the email channel is not configured".to_string());
        }

        warnings
    }
}
