//! In-memory customer profile store
//!
//! Used when no database is configured. Keys are `(tenant, customer)` so a
//! profile is only visible to its own tenant.

use std::collections::HashMap;

use application::{error::ApplicationError, ports::CustomerProfileStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::{CustomerId, CustomerProfile, TagAnalysis, TenantId};
use parking_lot::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct InMemoryCustomerProfileStore {
    profiles: RwLock<HashMap<(TenantId, CustomerId), CustomerProfile>>,
}

impl InMemoryCustomerProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl CustomerProfileStore for InMemoryCustomerProfileStore {
    async fn get_profile(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerProfile>, ApplicationError> {
        Ok(self
            .profiles
            .read()
            .get(&(*tenant_id, *customer_id))
            .cloned())
    }

    #[instrument(skip(self, analysis), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
    async fn save_tags(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        analysis: &TagAnalysis,
    ) -> Result<bool, ApplicationError> {
        let mut profiles = self.profiles.write();
        let Some(profile) = profiles.get_mut(&(*tenant_id, *customer_id)) else {
            debug!("Customer not found for tenant");
            return Ok(false);
        };
        profile.apply_smart_tags(analysis.clone());
        Ok(true)
    }

    async fn save_profile(&self, profile: &CustomerProfile) -> Result<(), ApplicationError> {
        let mut profile = profile.clone();
        profile.updated_at = Utc::now();
        self.profiles
            .write()
            .insert((profile.tenant_id, profile.id), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{SentimentLevel, TagName};

    fn vip() -> TagAnalysis {
        TagAnalysis::new([TagName::Vip], SentimentLevel::Positive, 0.9, "VIP", None).unwrap()
    }

    #[tokio::test]
    async fn save_tags_updates_existing_profile() {
        let store = InMemoryCustomerProfileStore::new();
        let profile = CustomerProfile::new(TenantId::new(), "Maria", "Santos", "+15550101");
        store.save_profile(&profile).await.unwrap();

        assert!(store.save_tags(&profile.tenant_id, &profile.id, &vip()).await.unwrap());

        let stored = store
            .get_profile(&profile.tenant_id, &profile.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.smart_tags, Some(vip()));
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let store = InMemoryCustomerProfileStore::new();
        let saved = store
            .save_tags(&TenantId::new(), &CustomerId::new(), &vip())
            .await
            .unwrap();
        assert!(!saved);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn other_tenant_cannot_see_profile() {
        let store = InMemoryCustomerProfileStore::new();
        let profile = CustomerProfile::new(TenantId::new(), "A", "B", "1");
        store.save_profile(&profile).await.unwrap();

        let intruder = TenantId::new();
        assert!(store.get_profile(&intruder, &profile.id).await.unwrap().is_none());
        assert!(!store.save_tags(&intruder, &profile.id, &vip()).await.unwrap());
        assert_eq!(store.len(), 1);
    }
}
