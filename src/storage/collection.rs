//! Generic JSON-backed collection
//!
//! One collection per resource, persisted to `data/<resource>.json` as
//! `{ "items": [...] }`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::Resource;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "R: Resource")]
struct CollectionData<R> {
    items: Vec<R>,
}

impl<R> Default for CollectionData<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// In-memory map of one resource's entities, loaded from and saved to disk
pub struct Collection<R: Resource> {
    path: PathBuf,
    data: RwLock<HashMap<R::Id, R>>,
}

impl<R: Resource> Collection<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load entities from disk, replacing what is in memory
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: CollectionData<R> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for item in file_data.items {
            data.insert(item.id(), item);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let file_data = CollectionData {
            items: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: R::Id) -> Result<Option<R>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All entities in sort-key order, ties broken by id
    pub fn get_all(&self) -> Result<Vec<R>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut items: Vec<R> = data.values().cloned().collect();
        items.sort_by_cached_key(|item| (item.sort_key(), item.id().to_string()));
        Ok(items)
    }

    pub fn upsert(&self, item: R) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(item.id(), item);
        Ok(())
    }

    pub fn delete(&self, id: R::Id) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }

    /// The unique field `item` would collide on, if another entity holds its key
    pub fn conflict(&self, item: &R) -> Result<Option<&'static str>, LedgerError> {
        let Some((field, key)) = item.unique_key() else {
            return Ok(None);
        };

        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let taken = data.values().any(|other| {
            other.id() != item.id() && other.unique_key().map(|(_, k)| k).as_ref() == Some(&key)
        });
        Ok(taken.then_some(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, CurrencyInput, EconomicGroup, EconomicGroupInput};
    use chrono::Utc;
    use tempfile::TempDir;

    fn group(code: &str) -> EconomicGroup {
        EconomicGroup::build(
            EconomicGroup::new_id(),
            EconomicGroupInput::new(code, format!("{} group", code)),
            Utc::now(),
        )
    }

    fn create_test_collection() -> (TempDir, Collection<EconomicGroup>) {
        let temp_dir = TempDir::new().unwrap();
        let collection = Collection::new(temp_dir.path().join("economic-groups.json"));
        (temp_dir, collection)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, collection) = create_test_collection();
        collection.load().unwrap();
        assert_eq!(collection.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_get_delete() {
        let (_temp_dir, collection) = create_test_collection();
        let g = group("HOLD");
        let id = g.id;

        collection.upsert(g).unwrap();
        assert_eq!(collection.get(id).unwrap().unwrap().code, "HOLD");

        assert!(collection.delete(id).unwrap());
        assert!(!collection.delete(id).unwrap());
        assert!(collection.get(id).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload_sorted() {
        let (temp_dir, collection) = create_test_collection();
        collection.upsert(group("ZETA")).unwrap();
        collection.upsert(group("ALFA")).unwrap();
        collection.save().unwrap();

        let reloaded: Collection<EconomicGroup> =
            Collection::new(temp_dir.path().join("economic-groups.json"));
        reloaded.load().unwrap();
        let codes: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|g| g.code)
            .collect();
        assert_eq!(codes, vec!["ALFA", "ZETA"]);
    }

    #[test]
    fn test_equal_sort_keys_keep_a_stable_order() {
        let (temp_dir, collection) = create_test_collection();
        for _ in 0..12 {
            collection.upsert(group("SAME")).unwrap();
        }
        let first: Vec<_> = collection.get_all().unwrap().iter().map(|g| g.id).collect();

        let mut ids = first.clone();
        ids.sort_by_key(|id| id.to_string());
        assert_eq!(first, ids);

        collection.save().unwrap();
        let reloaded: Collection<EconomicGroup> =
            Collection::new(temp_dir.path().join("economic-groups.json"));
        reloaded.load().unwrap();
        let second: Vec<_> = reloaded.get_all().unwrap().iter().map(|g| g.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conflict_ignores_self() {
        let temp_dir = TempDir::new().unwrap();
        let collection: Collection<Currency> =
            Collection::new(temp_dir.path().join("currencies.json"));

        let usd = Currency::build(
            Currency::new_id(),
            CurrencyInput::new("USD", "US Dollar", "$", 2),
            Utc::now(),
        );
        collection.upsert(usd.clone()).unwrap();
        assert_eq!(collection.conflict(&usd).unwrap(), None);

        let dup = Currency::build(
            Currency::new_id(),
            CurrencyInput::new("usd", "Dollar", "$", 2),
            Utc::now(),
        );
        assert_eq!(collection.conflict(&dup).unwrap(), Some("code"));
    }
}
