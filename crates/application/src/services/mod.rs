//! Application services - Use case implementations

mod analyze_tags_service;
mod fallback_tagger;
mod llm_tag_classifier;
mod notification_service;
mod tag_patterns;
mod tagging_service;
mod urgency_detector;

pub use analyze_tags_service::{AnalyzeTagsOutcome, AnalyzeTagsService};
pub use fallback_tagger::{DEFAULT_FALLBACK_CONFIDENCE, FALLBACK_SUMMARY, FallbackTagger};
pub use llm_tag_classifier::{
    CLASSIFIER_SYSTEM_PROMPT, DEFAULT_CLASSIFIER_CONFIDENCE, LlmTagClassifier,
};
pub use notification_service::{
    NotificationService, NotificationTargets, alert_body, alert_subject,
};
pub use tagging_service::TaggingService;
pub use urgency_detector::detect_urgency;
