//! The capital store: a read-mostly lookup table seeded once on first run.

use std::collections::HashSet;

use chrono::Utc;
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::info;

use crate::models::{CapitalRecord, SeedRecord};
use crate::pool::DbPool;

/// Errors from store access and seeding.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seed file {path} is unreadable: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file {path} is not valid JSON: {source}")]
    SeedParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Outcome of [`CapitalStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
    /// The table was empty and was populated with this many records.
    Seeded(u64),
    /// The store already held this many records; nothing was written.
    AlreadySeeded(u64),
}

/// Handle to the country → capital reference table.
///
/// Constructed once at startup and passed into request-handling code; there
/// is no process-wide engine handle.
#[derive(Clone)]
pub struct CapitalStore {
    db: DbPool,
}

impl CapitalStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create the `capitals` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS capitals (
                country TEXT PRIMARY KEY,
                capital TEXT NOT NULL,
                lat REAL NOT NULL,
                lon REAL NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Populate the store from `records` unless it already holds rows.
    ///
    /// Idempotent at the process level: a seeded store is left untouched and
    /// reported as [`SeedReport::AlreadySeeded`]. Inserts run inside one
    /// transaction, so a failed seed leaves the table empty rather than
    /// partially populated.
    pub async fn initialize(&self, records: &[SeedRecord]) -> Result<SeedReport, StoreError> {
        self.ensure_schema().await?;

        let existing = self.count().await?;
        if existing > 0 {
            info!("Capitals store already seeded with {} countries", existing);
            return Ok(SeedReport::AlreadySeeded(existing));
        }

        let seeded_at = Utc::now().to_rfc3339();
        let mut tx = self.db.pool().begin().await?;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO capitals (country, capital, lat, lon, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.country)
            .bind(&record.capital)
            .bind(record.lat)
            .bind(record.lon)
            .bind(&seeded_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Seeded capitals store with {} countries", records.len());
        Ok(SeedReport::Seeded(records.len() as u64))
    }

    /// Pick one country uniformly at random among those not in `excluded`.
    ///
    /// Returns `None` when every country has been excluded. Exclusion is a
    /// set difference over all country keys loaded per call, so every
    /// eligible country has equal selection probability and an excluded
    /// country can never be returned.
    pub async fn pick_random_unasked(
        &self,
        excluded: &HashSet<String>,
    ) -> Result<Option<String>, StoreError> {
        let remaining: Vec<String> = self
            .countries()
            .await?
            .into_iter()
            .filter(|country| !excluded.contains(country))
            .collect();

        Ok(remaining.choose(&mut rand::rng()).cloned())
    }

    /// All country keys currently in the store.
    pub async fn countries(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_scalar::<_, String>("SELECT country FROM capitals")
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    /// Fetch the reference record for `country`, or `None` if the country
    /// string is not a key (stale or tampered client data).
    pub async fn lookup(&self, country: &str) -> Result<Option<CapitalRecord>, StoreError> {
        let record = sqlx::query_as::<_, CapitalRecord>(
            "SELECT country, capital, lat, lon, created_at FROM capitals WHERE country = ?",
        )
        .bind(country)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(record)
    }

    /// Number of records in the store.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM capitals")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n as u64)
    }
}
