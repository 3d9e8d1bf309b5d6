//! WhatsApp client for sending messages
//!
//! Uses the Meta Graph API to send WhatsApp text messages.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// WhatsApp API errors
#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: i32, message: String },

    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),
}

/// WhatsApp client configuration
#[derive(Debug, Clone)]
pub struct WhatsAppClientConfig {
    /// Meta Graph API access token
    pub access_token: SecretString,
    /// Phone number ID from WhatsApp Business
    pub phone_number_id: String,
    /// API version (default: v18.0)
    pub api_version: String,
    /// Graph API root (default: https://graph.facebook.com)
    pub api_base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for WhatsAppClientConfig {
    fn default() -> Self {
        Self {
            access_token: SecretString::from(String::new()),
            phone_number_id: String::new(),
            api_version: "v18.0".to_string(),
            api_base_url: "https://graph.facebook.com".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// WhatsApp client for the Meta Graph API
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: Client,
    config: WhatsAppClientConfig,
    base_url: String,
}

/// Message send request
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    msg_type: &'static str,
    text: TextContent<'a>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    body: &'a str,
}

/// API response for sent message
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub messaging_product: String,
    #[serde(default)]
    pub contacts: Vec<ContactInfo>,
    #[serde(default)]
    pub messages: Vec<MessageInfo>,
}

impl SendMessageResponse {
    /// Id of the first accepted message
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactInfo {
    pub input: String,
    pub wa_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageInfo {
    pub id: String,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: i32,
    message: String,
}

impl WhatsAppClient {
    /// Create a new WhatsApp client
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        if config.access_token.expose_secret().is_empty() {
            return Err(WhatsAppError::Configuration(
                "access_token is required".to_string(),
            ));
        }
        if config.phone_number_id.is_empty() {
            return Err(WhatsAppError::Configuration(
                "phone_number_id is required".to_string(),
            ));
        }

        let base_url = format!(
            "{}/{}/{}",
            config.api_base_url.trim_end_matches('/'),
            config.api_version,
            config.phone_number_id
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Send a text message to an E.164 phone number (`+` prefix required)
    #[instrument(skip(self, message), fields(to = %to))]
    pub async fn send_message(
        &self,
        to: &str,
        message: &str,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        if !to.starts_with('+') || to.len() < 10 {
            return Err(WhatsAppError::InvalidPhoneNumber(to.to_string()));
        }

        // Graph API expects the number without the + prefix
        let phone = to.trim_start_matches('+');

        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: phone,
            msg_type: "text",
            text: TextContent { body: message },
        };

        debug!(phone = %phone, message_len = message.len(), "Sending WhatsApp message");

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            match response.json::<ApiErrorResponse>().await {
                Ok(error) => Err(WhatsAppError::Api {
                    code: error.error.code,
                    message: error.error.message,
                }),
                Err(_) => Err(WhatsAppError::Api {
                    code: i32::from(status.as_u16()),
                    message: status.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WhatsAppClientConfig {
        WhatsAppClientConfig {
            access_token: SecretString::from("test_token".to_string()),
            phone_number_id: "123456789".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn client_creation_requires_access_token() {
        let config = WhatsAppClientConfig {
            phone_number_id: "123".to_string(),
            ..Default::default()
        };

        let result = WhatsAppClient::new(config);
        assert!(matches!(result, Err(WhatsAppError::Configuration(_))));
    }

    #[test]
    fn client_creation_requires_phone_number_id() {
        let config = WhatsAppClientConfig {
            access_token: SecretString::from("token".to_string()),
            ..Default::default()
        };

        let result = WhatsAppClient::new(config);
        assert!(matches!(result, Err(WhatsAppError::Configuration(_))));
    }

    #[test]
    fn client_creation_succeeds_with_valid_config() {
        let client = WhatsAppClient::new(test_config()).unwrap();
        assert_eq!(
            client.base_url,
            "https://graph.facebook.com/v18.0/123456789"
        );
    }

    #[test]
    fn config_default_values() {
        let config = WhatsAppClientConfig::default();
        assert_eq!(config.api_version, "v18.0");
        assert_eq!(config.api_base_url, "https://graph.facebook.com");
    }

    #[test]
    fn config_debug_redacts_token() {
        let debug = format!("{:?}", test_config());
        assert!(!debug.contains("test_token"));
    }

    #[test]
    fn error_display() {
        let err = WhatsAppError::Configuration("test".to_string());
        assert!(err.to_string().contains("test"));

        let err = WhatsAppError::Api {
            code: 100,
            message: "Invalid".to_string(),
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("Invalid"));
    }

    #[tokio::test]
    async fn send_message_validates_phone_format() {
        let client = WhatsAppClient::new(test_config()).unwrap();

        // Missing + prefix
        let result = client.send_message("491234567890", "test").await;
        assert!(matches!(result, Err(WhatsAppError::InvalidPhoneNumber(_))));

        // Too short
        let result = client.send_message("+123", "test").await;
        assert!(matches!(result, Err(WhatsAppError::InvalidPhoneNumber(_))));
    }
}
