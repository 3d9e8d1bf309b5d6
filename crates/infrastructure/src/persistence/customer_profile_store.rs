//! SQLite customer profile store implementation
//!
//! Implements the `CustomerProfileStore` port using SQLite. Every statement
//! filters on `tenant_id`; smart tags are stored as JSON and re-validated
//! when read back.

use std::sync::Arc;

use application::{error::ApplicationError, ports::CustomerProfileStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CustomerId, CustomerProfile, TagAnalysis, TenantId};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::{ConnectionPool, DatabaseError};

const SELECT_COLUMNS: &str = "id, tenant_id, first_name, last_name, phone, email,
    dietary_preferences, special_request_text, manual_tags, smart_tags,
    customer_notes, staff_notes, created_at, updated_at";

/// SQLite-based customer profile store
#[derive(Debug, Clone)]
pub struct SqliteCustomerProfileStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCustomerProfileStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Run blocking database work off the async runtime
    async fn blocking<T, F>(&self, work: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let conn = pool.get().map_err(DatabaseError::from)?;
            work(&conn)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Database task failed: {e}")))?
        .map_err(ApplicationError::from)
    }
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

/// Convert a database row to a `CustomerProfile`
fn row_to_profile(row: &Row<'_>) -> Result<CustomerProfile, rusqlite::Error> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let manual_tags: String = row.get(8)?;
    let smart_tags: Option<String> = row.get(9)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;

    let smart_tags = match smart_tags {
        Some(json) => Some(
            serde_json::from_str::<TagAnalysis>(&json).map_err(|e| conversion_error(9, e))?,
        ),
        None => None,
    };

    Ok(CustomerProfile {
        id: CustomerId::parse(&id).map_err(|e| conversion_error(0, e))?,
        tenant_id: TenantId::parse(&tenant_id).map_err(|e| conversion_error(1, e))?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        dietary_preferences: row.get(6)?,
        special_request_text: row.get(7)?,
        manual_tags: serde_json::from_str(&manual_tags).map_err(|e| conversion_error(8, e))?,
        smart_tags,
        customer_notes: row.get(10)?,
        staff_notes: row.get(11)?,
        created_at: parse_timestamp(12, &created_at)?,
        updated_at: parse_timestamp(13, &updated_at)?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Corrupt(e.to_string()))
}

#[async_trait]
impl CustomerProfileStore for SqliteCustomerProfileStore {
    #[instrument(skip(self), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
    async fn get_profile(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerProfile>, ApplicationError> {
        let tenant = tenant_id.to_string();
        let customer = customer_id.to_string();

        self.blocking(move |conn| {
            let profile = conn
                .query_row(
                    &format!(
                        "SELECT {SELECT_COLUMNS} FROM customer_profiles
                         WHERE id = ?1 AND tenant_id = ?2"
                    ),
                    [&customer, &tenant],
                    row_to_profile,
                )
                .optional()?;

            debug!(found = profile.is_some(), "Retrieved customer profile");
            Ok(profile)
        })
        .await
    }

    #[instrument(skip(self, analysis), fields(tenant_id = %tenant_id, customer_id = %customer_id, sentiment = %analysis.sentiment()))]
    async fn save_tags(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        analysis: &TagAnalysis,
    ) -> Result<bool, ApplicationError> {
        let tenant = tenant_id.to_string();
        let customer = customer_id.to_string();
        let payload = to_json(analysis)?;
        let now = Utc::now().to_rfc3339();

        self.blocking(move |conn| {
            let updated = conn.execute(
                "UPDATE customer_profiles SET smart_tags = ?1, updated_at = ?2
                 WHERE id = ?3 AND tenant_id = ?4",
                params![payload, now, customer, tenant],
            )?;

            if updated == 0 {
                warn!("save_tags affected 0 rows");
            }
            Ok(updated > 0)
        })
        .await
    }

    #[instrument(skip(self, profile), fields(tenant_id = %profile.tenant_id, customer_id = %profile.id))]
    async fn save_profile(&self, profile: &CustomerProfile) -> Result<(), ApplicationError> {
        let profile = profile.clone();
        let manual_tags = to_json(&profile.manual_tags)?;
        let smart_tags = profile.smart_tags.as_ref().map(to_json).transpose()?;
        let now = Utc::now().to_rfc3339();

        self.blocking(move |conn| {
            // The tenant guard on the update keeps one tenant from overwriting
            // another tenant's row that happens to share the id.
            let written = conn.execute(
                "INSERT INTO customer_profiles (
                     id, tenant_id, first_name, last_name, phone, email,
                     dietary_preferences, special_request_text, manual_tags, smart_tags,
                     customer_notes, staff_notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 ON CONFLICT(id) DO UPDATE SET
                     first_name = excluded.first_name,
                     last_name = excluded.last_name,
                     phone = excluded.phone,
                     email = excluded.email,
                     dietary_preferences = excluded.dietary_preferences,
                     special_request_text = excluded.special_request_text,
                     manual_tags = excluded.manual_tags,
                     smart_tags = excluded.smart_tags,
                     customer_notes = excluded.customer_notes,
                     staff_notes = excluded.staff_notes,
                     updated_at = excluded.updated_at
                 WHERE customer_profiles.tenant_id = excluded.tenant_id",
                params![
                    profile.id.to_string(),
                    profile.tenant_id.to_string(),
                    profile.first_name,
                    profile.last_name,
                    profile.phone,
                    profile.email,
                    profile.dietary_preferences,
                    profile.special_request_text,
                    manual_tags,
                    smart_tags,
                    profile.customer_notes,
                    profile.staff_notes,
                    profile.created_at.to_rfc3339(),
                    now,
                ],
            )?;

            if written == 0 {
                return Err(DatabaseError::Corrupt(format!(
                    "customer {} belongs to another tenant",
                    profile.id
                )));
            }
            debug!("Saved customer profile");
            Ok(())
        })
        .await
    }
}
