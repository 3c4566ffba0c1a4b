use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{KeyValueStore, quota_error};

const STORE_VERSION: u32 = 1;
pub const STORE_FILE: &str = "cache_store.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, String>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    capacity: usize,
    file: StoreFile,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let file = load_store_file(&path);
        Self {
            path,
            capacity,
            file,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache dir {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(&self.file).context("serialize cache store")?;
        fs::write(&tmp, json).context("write cache store")?;
        fs::rename(&tmp, &self.path).context("swap cache store")?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.file.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.file.entries.contains_key(key) && self.file.entries.len() >= self.capacity {
            return Err(quota_error(self.name(), self.capacity, key));
        }
        self.file.version = STORE_VERSION;
        self.file.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.file.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save()
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.file.entries.keys().cloned().collect())
    }
}

fn load_store_file(path: &Path) -> StoreFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return StoreFile::default();
    };
    let Ok(file) = serde_json::from_str::<StoreFile>(&raw) else {
        debug!(path = %path.display(), "ignoring unreadable cache store");
        return StoreFile::default();
    };
    if file.version != STORE_VERSION {
        return StoreFile::default();
    }
    file
}
