//! Inbound analysis request

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::value_objects::{CustomerId, ReservationId, TenantId};

/// Guest notes of one reservation, to be tagged
///
/// Reservation and tenant ids are required correlation keys. Both text
/// fields may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnalysisRequest {
    pub reservation_id: ReservationId,
    pub tenant_id: TenantId,
    /// Existing customer profile to update with the result
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Display name used in history and logs
    #[serde(default)]
    #[validate(length(max = 200))]
    pub customer_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub special_request_text: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub dietary_preferences: String,
}

impl AnalysisRequest {
    /// Create a request without customer information
    #[must_use]
    pub fn new(
        reservation_id: ReservationId,
        tenant_id: TenantId,
        special_request_text: impl Into<String>,
        dietary_preferences: impl Into<String>,
    ) -> Self {
        Self {
            reservation_id,
            tenant_id,
            customer_id: None,
            customer_name: None,
            special_request_text: special_request_text.into(),
            dietary_preferences: dietary_preferences.into(),
        }
    }

    #[must_use]
    pub const fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Special request followed by dietary preferences, space separated
    #[must_use]
    pub fn combined_text(&self) -> String {
        combine_guest_text(&self.special_request_text, &self.dietary_preferences)
    }
}

/// Join the two guest-text fields in scanning order
#[must_use]
pub fn combine_guest_text(special_request: &str, dietary_preferences: &str) -> String {
    format!("{special_request} {dietary_preferences}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(special: &str, dietary: &str) -> AnalysisRequest {
        AnalysisRequest::new(ReservationId::new(), TenantId::new(), special, dietary)
    }

    #[test]
    fn empty_text_is_valid() {
        assert!(request("", "").validate().is_ok());
    }

    #[test]
    fn max_lengths_accepted() {
        let special = "a".repeat(2000);
        let dietary = "b".repeat(1000);
        assert!(request(&special, &dietary).validate().is_ok());
    }

    #[test]
    fn oversized_special_request_rejected() {
        let special = "a".repeat(2001);
        let errors = request(&special, "").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("special_request_text"));
    }

    #[test]
    fn oversized_dietary_rejected() {
        let dietary = "b".repeat(1001);
        let errors = request("", &dietary).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("dietary_preferences"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let dietary = "é".repeat(1000);
        assert!(request("", &dietary).validate().is_ok());
    }

    #[test]
    fn combined_text_orders_special_first() {
        assert_eq!(request("VIP", "vegan").combined_text(), "VIP vegan");
    }

    #[test]
    fn missing_ids_fail_deserialization() {
        let json = serde_json::json!({ "special_request_text": "hi" });
        assert!(serde_json::from_value::<AnalysisRequest>(json).is_err());
    }

    #[test]
    fn text_fields_default_to_empty() {
        let json = serde_json::json!({
            "reservation_id": ReservationId::new(),
            "tenant_id": TenantId::new(),
        });
        let req: AnalysisRequest = serde_json::from_value(json).unwrap();
        assert!(req.special_request_text.is_empty());
        assert!(req.dietary_preferences.is_empty());
        assert!(req.customer_id.is_none());
    }
}
