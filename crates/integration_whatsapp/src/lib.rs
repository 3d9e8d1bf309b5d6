//! WhatsApp integration
//!
//! Sends staff alert messages through the WhatsApp Business (Meta Graph) API.

pub mod client;

pub use client::{SendMessageResponse, WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
