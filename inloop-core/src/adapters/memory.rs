//! In-memory key-value store

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

/// Process-local storage; nothing survives the process.
///
/// Two session stores sharing one `MemoryStore` behave like two tabs sharing
/// one browser profile, which is what the restart tests rely on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> Result<T> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        Ok(f(&mut records))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_records(|records| records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_records(|records| {
            records.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_records(|records| {
            records.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_records(|records| records.keys().cloned().collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        store.set("a", "3").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
