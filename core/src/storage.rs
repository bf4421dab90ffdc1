use alloc::string::{String, ToString};
use hashbrown::HashMap;
use serde::{Serialize, de::DeserializeOwned};

use crate::*;

/// Persistent string key-value store, e.g. browser local storage.
///
/// Values are JSON-encoded by the typed helpers. Missing or unreadable values
/// read as `None` so callers can treat them as zero/unset.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Option<String>;

    fn set_raw(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Ignoring unreadable value for {:?}: {}", key, err);
                None
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|err| GameError::Storage(err.to_string()))?;
        self.set_raw(key, raw)
    }

    fn load<T: StorageKey + DeserializeOwned>(&self) -> Option<T>
    where
        Self: Sized,
    {
        self.get(T::KEY)
    }

    fn save<T: StorageKey + Serialize>(&mut self, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set(T::KEY, value)
    }
}

/// Types persisted under one fixed key.
pub trait StorageKey {
    const KEY: &'static str;
}

impl StorageKey for Tier {
    const KEY: &'static str = "level";
}

/// In-memory store, for tests and native front-ends that flush elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_roundtrip_as_json() {
        let mut store = MemoryStore::new();

        store.set("beginnerPlayed", &3u32).unwrap();
        store.save(&Tier::Expert).unwrap();

        assert_eq!(store.get_raw("beginnerPlayed").as_deref(), Some("3"));
        assert_eq!(store.get_raw("level").as_deref(), Some("\"expert\""));
        assert_eq!(store.load::<Tier>(), Some(Tier::Expert));
    }

    #[test]
    fn unreadable_or_missing_values_are_none() {
        let mut store = MemoryStore::new();
        store.set_raw("rows", "NaN".to_string()).unwrap();

        assert_eq!(store.get::<u32>("rows"), None);
        assert_eq!(store.get::<u32>("columns"), None);
    }
}
