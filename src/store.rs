use std::collections::HashMap;

use anyhow::{Result, anyhow};
use tracing::{debug, warn};

pub trait KeyValueStore {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

pub(crate) fn quota_error(store: &str, capacity: usize, key: &str) -> anyhow::Error {
    anyhow!("{store} store full ({capacity} entries), cannot add {key}")
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: &'static str,
    capacity: usize,
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            return Err(quota_error(self.name, self.capacity, key));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Primary store with a secondary mirror; a secondary hit is written back to the primary.
pub struct TieredStore {
    primary: Box<dyn KeyValueStore>,
    secondary: Box<dyn KeyValueStore>,
}

impl TieredStore {
    pub fn new(primary: Box<dyn KeyValueStore>, secondary: Box<dyn KeyValueStore>) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &dyn KeyValueStore {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> &dyn KeyValueStore {
        self.secondary.as_ref()
    }

    pub fn get_valid(&mut self, key: &str, accept: impl Fn(&str) -> bool) -> Option<String> {
        if let Some(raw) = read_tier(self.primary.as_ref(), key) {
            if accept(&raw) {
                return Some(raw);
            }
        }
        let raw = read_tier(self.secondary.as_ref(), key)?;
        if !accept(&raw) {
            return None;
        }
        debug!(key, from = self.secondary.name(), to = self.primary.name(), "repopulating primary tier");
        if let Err(err) = self.primary.set(key, &raw) {
            warn!(key, store = self.primary.name(), "self-heal write failed: {err:#}");
        }
        Some(raw)
    }

    pub fn set_each(&mut self, key: &str, primary_value: &str, secondary_value: &str) {
        if let Err(err) = self.primary.set(key, primary_value) {
            warn!(key, store = self.primary.name(), "write failed: {err:#}");
        }
        if let Err(err) = self.secondary.set(key, secondary_value) {
            warn!(key, store = self.secondary.name(), "write failed: {err:#}");
        }
    }

    pub fn remove_both(&mut self, key: &str) {
        for store in [&mut self.primary, &mut self.secondary] {
            if let Err(err) = store.remove(key) {
                warn!(key, store = store.name(), "remove failed: {err:#}");
            }
        }
    }
}

impl KeyValueStore for TieredStore {
    fn name(&self) -> &'static str {
        "tiered"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.primary.get(key)? {
            Some(raw) => Ok(Some(raw)),
            None => self.secondary.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_each(key, value, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_both(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = self.primary.keys()?;
        for key in self.secondary.keys()? {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

fn read_tier(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, store = store.name(), "read failed: {err:#}");
            None
        }
    }
}
