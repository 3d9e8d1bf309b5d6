//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod analysis_history;
mod customer_profile_store;
mod inference_port;
mod notification_transport;
mod tag_classifier;

pub use analysis_history::AnalysisHistoryPort;
#[cfg(test)]
pub use analysis_history::MockAnalysisHistoryPort;
pub use customer_profile_store::CustomerProfileStore;
#[cfg(test)]
pub use customer_profile_store::MockCustomerProfileStore;
#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult};
#[cfg(test)]
pub use notification_transport::MockNotificationTransportPort;
pub use notification_transport::NotificationTransportPort;
#[cfg(test)]
pub use tag_classifier::MockTagClassifier;
pub use tag_classifier::TagClassifier;
