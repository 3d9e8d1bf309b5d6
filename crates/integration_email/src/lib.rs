//! SMTP delivery for staff alert emails
//!
//! A small async SMTP client on top of tokio sockets. Supports STARTTLS,
//! implicit TLS (port 465) and plaintext relays, with optional AUTH PLAIN.

mod config;
mod error;
mod smtp_client;
mod tls;

pub use config::SmtpConfig;
pub use error::EmailError;
pub use smtp_client::{OutgoingEmail, SmtpClient};
