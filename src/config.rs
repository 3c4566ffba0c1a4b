use std::env;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "league_core";
const DEFAULT_TTL_SECS: u64 = 10 * 60;
const MIN_TTL_SECS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    File,
    Memory,
}

impl Backend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Some(Backend::Sqlite),
            "file" | "json" => Some(Backend::File),
            "memory" | "mem" => Some(Backend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    // The secondary tier is a mirror; keep it on the same lifetime as the primary.
    pub secondary_ttl: Duration,
    pub primary_capacity: usize,
    pub secondary_capacity: usize,
    pub backend: Backend,
    pub cache_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            secondary_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            primary_capacity: 5000,
            secondary_capacity: 500,
            backend: Backend::Sqlite,
            cache_dir: app_cache_dir(),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            ttl: Duration::from_secs(
                env_parse("LEAGUE_CACHE_TTL_SECS")
                    .unwrap_or(d.ttl.as_secs())
                    .max(MIN_TTL_SECS),
            ),
            secondary_ttl: Duration::from_secs(
                env_parse("LEAGUE_CACHE_SECONDARY_TTL_SECS")
                    .unwrap_or(d.secondary_ttl.as_secs())
                    .max(MIN_TTL_SECS),
            ),
            primary_capacity: env_parse("LEAGUE_CACHE_PRIMARY_CAPACITY")
                .unwrap_or(d.primary_capacity),
            secondary_capacity: env_parse("LEAGUE_CACHE_SECONDARY_CAPACITY")
                .unwrap_or(d.secondary_capacity),
            backend: env::var("LEAGUE_CACHE_BACKEND")
                .ok()
                .and_then(|v| Backend::parse(&v))
                .unwrap_or(d.backend),
            cache_dir: env::var("LEAGUE_CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .or(d.cache_dir),
        }
    }

    pub fn ttl_millis(&self) -> i64 {
        duration_millis(self.ttl)
    }

    pub fn secondary_ttl_millis(&self) -> i64 {
        duration_millis(self.secondary_ttl)
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
