//! Storage initialization
//!
//! Handles first-run setup and the default currency catalog.

use chrono::Utc;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::currency::default_currencies;
use crate::models::{Currency, Resource};

use super::Storage;

/// Prepare the data directory and seed the currency catalog when empty
///
/// Returns the number of currencies seeded.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<usize, LedgerError> {
    let storage = Storage::new(paths.clone())?;
    let currencies = storage.collection::<Currency>()?;

    if currencies.count()? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let defaults = default_currencies();
    let seeded = defaults.len();
    for input in defaults {
        currencies.upsert(Currency::build(Currency::new_id(), input, now))?;
    }
    currencies.save()?;

    log::info!("Seeded {} default currencies", seeded);
    Ok(seeded)
}
