use std::time::Duration;

use serde_json::{Value, json};

use league_core::cache::{self, CacheStore, player_stats_key};
use league_core::clock::ManualClock;
use league_core::config::{Backend, CacheConfig};
use league_core::file_store::JsonFileStore;
use league_core::store::{KeyValueStore, MemoryStore};

const TEN_MINUTES: i64 = 10 * 60 * 1000;

fn config() -> CacheConfig {
    CacheConfig {
        backend: Backend::Memory,
        cache_dir: None,
        ..CacheConfig::default()
    }
}

fn memory_cache() -> (CacheStore, ManualClock) {
    let clock = ManualClock::starting_at(1_700_000_000_000);
    let store = CacheStore::in_memory(config(), Box::new(clock.clone()));
    (store, clock)
}

#[test]
fn round_trip_until_ttl_elapses() {
    let (mut store, clock) = memory_cache();
    store.set("k", &json!({"x": 1}));
    assert_eq!(store.get::<Value>("k"), Some(json!({"x": 1})));

    clock.advance(TEN_MINUTES);
    assert_eq!(store.get::<Value>("k"), Some(json!({"x": 1})));

    clock.advance(1);
    assert_eq!(store.get::<Value>("k"), None);
}

#[test]
fn typed_reads() {
    let (mut store, _clock) = memory_cache();
    store.set("ids", &vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        store.get::<Vec<String>>("ids"),
        Some(vec!["a".to_string(), "b".to_string()])
    );
    // Wrong shape reads as a miss rather than an error.
    assert_eq!(store.get::<u32>("ids"), None);
    assert_eq!(store.get::<Value>("never-set"), None);
}

#[test]
fn custom_ttl_comes_from_config() {
    let clock = ManualClock::starting_at(0);
    let cfg = CacheConfig {
        ttl: Duration::from_secs(5),
        secondary_ttl: Duration::from_secs(5),
        ..config()
    };
    let mut store = CacheStore::in_memory(cfg, Box::new(clock.clone()));
    store.set("k", &1);
    clock.set(5_000);
    assert_eq!(store.get::<u32>("k"), Some(1));
    clock.set(5_001);
    assert_eq!(store.get::<u32>("k"), None);
}

#[test]
fn corrupt_primary_falls_back_to_secondary_and_heals() {
    let clock = ManualClock::starting_at(0);
    let mut primary = MemoryStore::with_capacity("primary", 10);
    let mut secondary = MemoryStore::with_capacity("secondary", 10);
    primary.set("k", "{broken").unwrap();
    secondary
        .set("k", r#"{"data":{"x":2},"expiry":1000}"#)
        .unwrap();

    let mut store = CacheStore::new(
        Box::new(primary),
        Box::new(secondary),
        config(),
        Box::new(clock.clone()),
    );
    assert_eq!(store.get::<Value>("k"), Some(json!({"x": 2})));
    assert_eq!(store.get::<Value>("k"), Some(json!({"x": 2})));

    clock.set(1_001);
    assert_eq!(store.get::<Value>("k"), None);
}

#[test]
fn expired_primary_is_not_rescued_by_expired_secondary() {
    let clock = ManualClock::starting_at(0);
    let mut primary = MemoryStore::with_capacity("primary", 10);
    let mut secondary = MemoryStore::with_capacity("secondary", 10);
    primary.set("k", r#"{"data":1,"expiry":10}"#).unwrap();
    secondary.set("k", r#"{"data":2,"expiry":20}"#).unwrap();

    let mut store = CacheStore::new(
        Box::new(primary),
        Box::new(secondary),
        config(),
        Box::new(clock.clone()),
    );
    clock.set(15);
    assert_eq!(store.get::<u32>("k"), Some(2));
    clock.set(21);
    assert_eq!(store.get::<u32>("k"), None);
}

#[test]
fn secondary_capacity_overflow_keeps_primary_copy() {
    let clock = ManualClock::starting_at(0);
    let cfg = CacheConfig {
        secondary_capacity: 1,
        ..config()
    };
    let mut store = CacheStore::in_memory(cfg, Box::new(clock));
    store.set("a", &1);
    store.set("b", &2);
    assert_eq!(store.get::<u32>("a"), Some(1));
    assert_eq!(store.get::<u32>("b"), Some(2));
}

#[test]
fn clear_removes_both_tiers() {
    let (mut store, _clock) = memory_cache();
    store.set(cache::LEAGUES, &json!([]));
    store.clear(cache::LEAGUES);
    assert_eq!(store.get::<Value>(cache::LEAGUES), None);
    assert!(!store.status()[cache::LEAGUES]);
}

#[test]
fn clear_all_wipes_named_and_player_stats_keys() {
    let (mut store, _clock) = memory_cache();
    for key in cache::NAMED_KEYS {
        store.set(key, &json!([]));
    }
    store.set(&player_stats_key("p1"), &json!({"goals": 1}));
    store.set(&player_stats_key("p2"), &json!({"goals": 2}));
    store.set("unrelated", &1);

    let status = store.status();
    assert!(status.values().all(|present| *present));
    assert_eq!(status.len(), 7);

    store.clear_all();

    let status = store.status();
    assert_eq!(status.len(), 5);
    assert!(status.values().all(|present| !*present));
    assert_eq!(store.get::<Value>(&player_stats_key("p1")), None);
    assert_eq!(store.get::<u32>("unrelated"), Some(1));
}

#[test]
fn status_reports_expired_entries_as_present() {
    let (mut store, clock) = memory_cache();
    store.set(cache::MATCHES, &json!([]));
    clock.advance(TEN_MINUTES * 2);
    assert!(store.status()[cache::MATCHES]);
    assert_eq!(store.get::<Value>(cache::MATCHES), None);
}

#[test]
fn file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CacheConfig {
        backend: Backend::File,
        cache_dir: Some(dir.path().to_path_buf()),
        ..CacheConfig::default()
    };
    let clock = ManualClock::starting_at(0);

    let mut store = CacheStore::open(cfg.clone(), Box::new(clock.clone())).unwrap();
    store.set(cache::PLAYERS, &json!([{"id": "p1"}]));
    drop(store);

    let file = JsonFileStore::open(dir.path().join(league_core::file_store::STORE_FILE), 10);
    assert!(file.get(cache::PLAYERS).unwrap().is_some());

    // The in-memory mirror is gone after a restart; the durable tier answers.
    let mut reopened = CacheStore::open(cfg, Box::new(clock)).unwrap();
    assert_eq!(
        reopened.get::<Value>(cache::PLAYERS),
        Some(json!([{"id": "p1"}]))
    );
}

#[test]
fn sqlite_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CacheConfig {
        backend: Backend::Sqlite,
        cache_dir: Some(dir.path().to_path_buf()),
        ..CacheConfig::default()
    };
    let clock = ManualClock::starting_at(0);

    let mut store = CacheStore::open(cfg.clone(), Box::new(clock.clone())).unwrap();
    store.set(&player_stats_key("p9"), &json!({"goals": 3}));
    drop(store);

    let mut reopened = CacheStore::open(cfg, Box::new(clock)).unwrap();
    assert_eq!(reopened.status().get("playerstats_cache_p9"), Some(&true));
    reopened.clear_all();
    assert_eq!(reopened.status().get("playerstats_cache_p9"), None);
}
