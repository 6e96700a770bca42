//! Row and seed-file types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One country/capital reference fact as stored in the database.
///
/// Immutable after seeding. `lat`/`lon` are informational and returned to
/// the client on answer checks, never validated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CapitalRecord {
    pub country: String,
    pub capital: String,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
}

/// One entry of the JSON seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRecord {
    pub country: String,
    pub capital: String,
    pub lat: f64,
    pub lon: f64,
}
