//! SQL storage backend.

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use tracing::debug;
use xtally_core::{ConnectionEvent, DATE_TIME_FORMAT, HourlyUsage};

use crate::error::StoreError;
use crate::traits::TrafficStore;

use super::config::SqlStoreConfig;
use super::queries::{self, Queries};

/// Database type enum for query selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// PostgreSQL database.
    PostgreSQL,
    /// MySQL/MariaDB database.
    MySQL,
    /// SQLite database.
    SQLite,
}

impl DatabaseType {
    /// Detect database type from URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if url.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }
}

/// SQL-backed traffic store.
///
/// Supports PostgreSQL, MySQL, and SQLite through SQLx. The pool is the
/// only shared state; it is safe to use from the persistence worker and
/// the stats poller at the same time.
pub struct SqlStore {
    pool: AnyPool,
    db_type: DatabaseType,
    queries: &'static Queries,
    config: SqlStoreConfig,
}

impl SqlStore {
    /// Connect to the database and create missing tables.
    pub async fn connect(config: SqlStoreConfig) -> Result<Self, StoreError> {
        // Install database drivers for the "any" pool
        sqlx::any::install_default_drivers();

        let db_type = DatabaseType::from_url(&config.database_url).ok_or_else(|| {
            let scheme = config.database_url.split(':').next().unwrap_or_default();
            StoreError::UnsupportedUrl(scheme.to_string())
        })?;

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        let store = Self {
            pool,
            db_type,
            queries: queries::for_database(db_type),
            config,
        };

        if store.config.create_schema {
            store.create_schema().await?;
        }

        Ok(store)
    }

    /// Create tables and indexes if they do not exist.
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        for statement in self.queries.schema {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!(db_type = ?self.db_type, "database schema ready");
        Ok(())
    }

    /// Get the connection pool (for advanced usage).
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get database type.
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    fn parse_usage_row(row: &AnyRow) -> Result<HourlyUsage, StoreError> {
        let decode = |e: sqlx::Error| StoreError::InvalidRow(e.to_string());
        Ok(HourlyUsage {
            user: row.try_get("user").map_err(decode)?,
            date: row.try_get("date").map_err(decode)?,
            time: row.try_get("time").map_err(decode)?,
            down: row.try_get("down").map_err(decode)?,
            up: row.try_get("up").map_err(decode)?,
        })
    }
}

#[async_trait]
impl TrafficStore for SqlStore {
    async fn insert_event(&self, event: &ConnectionEvent) -> Result<(), StoreError> {
        sqlx::query(self.queries.insert_event)
            .bind(&event.user)
            .bind(&event.ip)
            .bind(&event.target)
            .bind(&event.inbound)
            .bind(&event.outbound)
            .bind(event.request_time.format(DATE_TIME_FORMAT).to_string())
            .bind(&event.server)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
    ) -> Result<Option<HourlyUsage>, StoreError> {
        let row = sqlx::query(self.queries.find_usage)
            .bind(user)
            .bind(date)
            .bind(time)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_usage_row).transpose()
    }

    async fn insert_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        sqlx::query(self.queries.insert_usage)
            .bind(&usage.user)
            .bind(&usage.date)
            .bind(&usage.time)
            .bind(usage.down)
            .bind(usage.up)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        sqlx::query(self.queries.update_usage)
            .bind(usage.down)
            .bind(usage.up)
            .bind(&usage.user)
            .bind(&usage.date)
            .bind(&usage.time)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn daily_usage(&self, date: &str) -> Result<Vec<HourlyUsage>, StoreError> {
        let rows = sqlx::query(self.queries.daily_usage)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::parse_usage_row).collect()
    }

    async fn add_hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
        up: i64,
        down: i64,
    ) -> Result<HourlyUsage, StoreError> {
        // The upsert resolves against the unique bucket key, so two writers
        // racing on a missing bucket still end up with one summed row.
        let mut tx = self.pool.begin().await?;

        sqlx::query(self.queries.add_usage)
            .bind(user)
            .bind(date)
            .bind(time)
            .bind(down)
            .bind(up)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(self.queries.find_usage)
            .bind(user)
            .bind(date)
            .bind(time)
            .fetch_one(&mut *tx)
            .await?;
        let usage = Self::parse_usage_row(&row)?;

        tx.commit().await?;
        Ok(usage)
    }
}

// Debug implementation (don't leak credentials)
impl std::fmt::Debug for SqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlStore")
            .field("db_type", &self.db_type)
            .field("max_connections", &self.config.max_connections)
            .finish_non_exhaustive()
    }
}
