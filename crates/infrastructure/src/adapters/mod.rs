//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod email_adapter;
mod groq_inference_adapter;
mod in_memory_history;
mod in_memory_profile_store;
mod in_system_notification_adapter;
mod whatsapp_adapter;

pub use email_adapter::SmtpNotificationAdapter;
pub use groq_inference_adapter::GroqInferenceAdapter;
pub use in_memory_history::{DEFAULT_HISTORY_CAPACITY, InMemoryAnalysisHistory};
pub use in_memory_profile_store::InMemoryCustomerProfileStore;
pub use in_system_notification_adapter::{DEFAULT_INBOX_CAPACITY, InSystemNotificationAdapter};
pub use whatsapp_adapter::WhatsAppNotificationAdapter;
