//! Customer profile storage port
//!
//! Every operation is scoped by tenant; a customer that exists under another
//! tenant is reported as absent.

use async_trait::async_trait;
use domain::{CustomerId, CustomerProfile, TagAnalysis, TenantId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for customer profile persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CustomerProfileStore: Send + Sync {
    /// Get a profile by id within a tenant
    async fn get_profile(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerProfile>, ApplicationError>;

    /// Store an analysis on a customer profile
    ///
    /// Returns `true` if the profile was found and updated, `false` if not found.
    async fn save_tags(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        analysis: &TagAnalysis,
    ) -> Result<bool, ApplicationError>;

    /// Insert or replace a profile
    async fn save_profile(&self, profile: &CustomerProfile) -> Result<(), ApplicationError>;
}
