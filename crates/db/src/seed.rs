//! Seed-file loading for first-run population of the store.

use std::path::Path;

use crate::models::SeedRecord;
use crate::store::StoreError;

/// Read and parse the JSON seed file at `path`.
///
/// The file holds an ordered array of `{country, capital, lat, lon}`
/// objects. Unreadable files and malformed JSON map to distinct error
/// variants so startup logs say which one happened.
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<SeedRecord>, StoreError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
        path: path.display().to_string(),
        source,
    })?;

    let records: Vec<SeedRecord> =
        serde_json::from_str(&raw).map_err(|source| StoreError::SeedParse {
            path: path.display().to_string(),
            source,
        })?;

    Ok(records)
}
