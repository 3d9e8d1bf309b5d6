//! Domain entities

mod analysis_record;
mod analysis_request;
mod customer_profile;
mod notification_event;
mod tag_analysis;

pub use analysis_record::AnalysisRecord;
pub use analysis_request::{AnalysisRequest, combine_guest_text};
pub use customer_profile::CustomerProfile;
pub use notification_event::NotificationEvent;
pub use tag_analysis::{
    DEFAULT_URGENT_REASON, MAX_SUMMARY_CHARS, MAX_URGENT_REASON_CHARS, TagAnalysis,
    TagAnalysisBuilder, truncate_chars,
};
