//! Database migrations
//!
//! Schema versioning for the SQLite store. SQL files in `/migrations`
//! document each version; the statements below are what runs.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new SQL file: `migrations/VXXX__description.sql`
//! 2. Increment `SCHEMA_VERSION`
//! 3. Add a `migrate_vX` function and call it from `run_migrations`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(
                version = 1,
                error = %e,
                "Migration V001 (customer profiles) failed. Check migrations/V001__customer_profiles.sql for the expected schema."
            );
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Get current schema version
pub fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration to version 1: customer profiles
/// See: migrations/V001__customer_profiles.sql
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: customer profiles");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS customer_profiles (
            id TEXT PRIMARY KEY NOT NULL,
            tenant_id TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT,
            dietary_preferences TEXT,
            special_request_text TEXT,
            manual_tags TEXT NOT NULL DEFAULT '[]',
            smart_tags TEXT,
            customer_notes TEXT,
            staff_notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ix_customer_profiles_tenant_phone
            ON customer_profiles(tenant_id, phone);

        CREATE INDEX IF NOT EXISTS ix_customer_profiles_tenant
            ON customer_profiles(tenant_id);
        ",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_migrated() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        let tables: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customer_profiles'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn phone_is_unique_per_tenant() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let insert = "INSERT INTO customer_profiles
            (id, tenant_id, first_name, last_name, phone, created_at, updated_at)
            VALUES (?1, ?2, 'A', 'B', '+15550100', 'now', 'now')";
        conn.execute(insert, ["c1", "t1"]).unwrap();
        conn.execute(insert, ["c2", "t2"]).unwrap();
        assert!(conn.execute(insert, ["c3", "t1"]).is_err());
    }
}
