use std::collections::BTreeMap;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{Backend, CacheConfig};
use crate::file_store::{JsonFileStore, STORE_FILE};
use crate::sqlite_store::{STORE_DB, SqliteStore};
use crate::store::{KeyValueStore, MemoryStore, TieredStore};

pub const LEAGUES: &str = "leagues_cache";
pub const MATCHES: &str = "matches_cache";
pub const PLAYERS: &str = "players_cache";
pub const LEADERBOARD: &str = "leaderboard_cache";
pub const DREAMTEAM: &str = "dreamteam_cache";
pub const PLAYER_STATS_PREFIX: &str = "playerstats_cache_";

pub const NAMED_KEYS: [&str; 5] = [LEAGUES, MATCHES, PLAYERS, LEADERBOARD, DREAMTEAM];

pub fn player_stats_key(player_id: &str) -> String {
    format!("{PLAYER_STATS_PREFIX}{player_id}")
}

pub fn motm_leaderboard_key(match_id: &str) -> String {
    format!("leaderboard_motm_{match_id}")
}

/// Stored form of every cache key: `{"data": ..., "expiry": <epoch millis>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub expiry: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_live(&self, now_millis: i64) -> bool {
        now_millis <= self.expiry
    }
}

// Reads never fail: an expired, corrupt or unreadable entry is a miss.
pub struct CacheStore {
    tiers: TieredStore,
    clock: Box<dyn Clock>,
    config: CacheConfig,
}

impl CacheStore {
    pub fn new(
        primary: Box<dyn KeyValueStore>,
        secondary: Box<dyn KeyValueStore>,
        config: CacheConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            tiers: TieredStore::new(primary, secondary),
            clock,
            config,
        }
    }

    pub fn in_memory(config: CacheConfig, clock: Box<dyn Clock>) -> Self {
        let primary = MemoryStore::with_capacity("primary", config.primary_capacity);
        let secondary = MemoryStore::with_capacity("secondary", config.secondary_capacity);
        Self::new(Box::new(primary), Box::new(secondary), config, clock)
    }

    pub fn open(config: CacheConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let primary: Box<dyn KeyValueStore> = match (config.backend, config.cache_dir.as_ref()) {
            (Backend::Sqlite, Some(dir)) => {
                Box::new(SqliteStore::open(&dir.join(STORE_DB), config.primary_capacity)?)
            }
            (Backend::File, Some(dir)) => {
                Box::new(JsonFileStore::open(dir.join(STORE_FILE), config.primary_capacity))
            }
            (Backend::Memory, _) | (_, None) => {
                Box::new(MemoryStore::with_capacity("primary", config.primary_capacity))
            }
        };
        let secondary = MemoryStore::with_capacity("secondary", config.secondary_capacity);
        Ok(Self::new(primary, Box::new(secondary), config, clock))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let entry = self.get_entry(key)?;
        match serde_json::from_value(entry.data) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!(key, "cached data has unexpected shape: {err}");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, data: &T) {
        let now = self.clock.now_millis();
        let primary = encode_entry(data, now.saturating_add(self.config.ttl_millis()));
        let secondary = encode_entry(data, now.saturating_add(self.config.secondary_ttl_millis()));
        match (primary, secondary) {
            (Ok(primary), Ok(secondary)) => self.tiers.set_each(key, &primary, &secondary),
            (Err(err), _) | (_, Err(err)) => warn!(key, "cannot serialize cache data: {err}"),
        }
    }

    pub fn clear(&mut self, key: &str) {
        self.tiers.remove_both(key);
    }

    pub fn clear_all(&mut self) {
        let mut keys: Vec<String> = NAMED_KEYS.iter().map(|k| k.to_string()).collect();
        keys.extend(self.player_stats_keys());
        info!(count = keys.len(), "clearing all caches");
        for key in keys {
            self.tiers.remove_both(&key);
        }
    }

    // Expired entries still count as present.
    pub fn status(&self) -> BTreeMap<String, bool> {
        let primary = self.tiers.primary();
        let mut out: BTreeMap<String, bool> = NAMED_KEYS
            .iter()
            .map(|key| (key.to_string(), matches!(primary.get(key), Ok(Some(_)))))
            .collect();
        if let Ok(keys) = primary.keys() {
            for key in keys {
                if key.starts_with(PLAYER_STATS_PREFIX) {
                    out.insert(key, true);
                }
            }
        }
        out
    }

    pub(crate) fn get_entry(&mut self, key: &str) -> Option<CacheEntry<Value>> {
        let now = self.clock.now_millis();
        let raw = self.tiers.get_valid(key, |raw| decode_entry(raw).is_some_and(|e| e.is_live(now)));
        let Some(raw) = raw else {
            debug!(key, "cache miss");
            return None;
        };
        decode_entry(&raw)
    }

    fn player_stats_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for store in [self.tiers.primary(), self.tiers.secondary()] {
            match store.keys() {
                Ok(found) => {
                    for key in found {
                        if key.starts_with(PLAYER_STATS_PREFIX) && !keys.contains(&key) {
                            keys.push(key);
                        }
                    }
                }
                Err(err) => warn!(store = store.name(), "cannot list keys: {err:#}"),
            }
        }
        keys
    }
}

fn encode_entry<T: Serialize + ?Sized>(data: &T, expiry: i64) -> serde_json::Result<String> {
    serde_json::to_string(&CacheEntry { data, expiry })
}

fn decode_entry(raw: &str) -> Option<CacheEntry<Value>> {
    serde_json::from_str::<CacheEntry<Value>>(raw).ok()
}
