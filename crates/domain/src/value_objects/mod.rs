//! Value Objects - Immutable, identity-less domain primitives

mod ids;
mod notification_channel;
mod sentiment_level;
mod tag_name;

pub use ids::{AnalysisId, CustomerId, NotificationId, ReservationId, TenantId};
pub use notification_channel::{NotificationChannel, NotificationStatus};
pub use sentiment_level::SentimentLevel;
pub use tag_name::TagName;
