//! AI Core - Chat-completion inference engine
//!
//! Provides an async client for OpenAI-compatible chat-completion APIs
//! (Groq by default) used by the tag classifier. Requests are single-shot,
//! with an optional JSON-object response format.

pub mod config;
pub mod error;
pub mod openai;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use openai::ChatCompletionEngine;
pub use ports::{
    InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage,
};
