//! Customer profile entity
//!
//! A guest known to one tenant, carrying the latest smart-tag analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::TagAnalysis;
use crate::value_objects::{CustomerId, TenantId};

/// Tenant-scoped guest profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub tenant_id: TenantId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw dietary text captured at reservation time
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub special_request_text: Option<String>,
    /// Staff-assigned free-form tags (e.g. "Regular")
    #[serde(default)]
    pub manual_tags: Vec<String>,
    /// Latest analysis produced by the tagging engine
    #[serde(default)]
    pub smart_tags: Option<TagAnalysis>,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub staff_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerProfile {
    /// Create a profile with no tags
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CustomerId::new(),
            tenant_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: None,
            dietary_preferences: None,
            special_request_text: None,
            manual_tags: Vec::new(),
            smart_tags: None,
            customer_notes: None,
            staff_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replace the stored analysis
    pub fn apply_smart_tags(&mut self, analysis: TagAnalysis) {
        self.smart_tags = Some(analysis);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{SentimentLevel, TagName};

    #[test]
    fn new_profile_has_no_tags() {
        let profile = CustomerProfile::new(TenantId::new(), "Maria", "Santos", "+15550101");
        assert!(profile.smart_tags.is_none());
        assert!(profile.manual_tags.is_empty());
        assert_eq!(profile.full_name(), "Maria Santos");
    }

    #[test]
    fn apply_smart_tags_replaces_analysis() {
        let mut profile = CustomerProfile::new(TenantId::new(), "A", "B", "1");
        let before = profile.updated_at;
        let analysis =
            TagAnalysis::new([TagName::Vip], SentimentLevel::Positive, 0.9, "vip", None).unwrap();
        profile.apply_smart_tags(analysis.clone());
        assert_eq!(profile.smart_tags, Some(analysis));
        assert!(profile.updated_at >= before);
    }
}
