use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cache::{self, CacheStore};
use crate::state::{League, Match, Member};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueChange {
    Created,
    Updated,
    Joined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMetric {
    Goals,
    Assists,
    Motm,
    CleanSheets,
}

impl LeaderboardMetric {
    pub fn field(self) -> &'static str {
        match self {
            LeaderboardMetric::Goals => "goals",
            LeaderboardMetric::Assists => "assists",
            LeaderboardMetric::Motm => "motm",
            LeaderboardMetric::CleanSheets => "cleanSheets",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub motm: u32,
    #[serde(default)]
    pub clean_sheets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl From<&Member> for RosterEntry {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            first_name: m.first_name.clone(),
            last_name: m.last_name.clone(),
            profile_picture: m.profile_picture.clone(),
        }
    }
}

/// Overwrite `existing`'s top-level keys with those of `incoming`.
pub fn shallow_merge(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(old), Value::Object(new)) => {
            for (k, v) in new {
                old.insert(k, v);
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

impl CacheStore {
    pub fn update_league_cache(&mut self, league: &League, change: LeagueChange) {
        let Some(value) = to_json(league) else { return };
        let Some(mut leagues) = self.collection(cache::LEAGUES) else {
            if change == LeagueChange::Created {
                self.set(cache::LEAGUES, &vec![value]);
            }
            return;
        };

        match (position_by_id(&leagues, &league.id), change) {
            (Some(i), LeagueChange::Created | LeagueChange::Updated) => {
                shallow_merge(&mut leagues[i], value)
            }
            (Some(_), LeagueChange::Joined) => return,
            (None, LeagueChange::Created) => leagues.insert(0, value),
            (None, LeagueChange::Joined) => leagues.push(value),
            (None, LeagueChange::Updated) => return,
        }
        self.set(cache::LEAGUES, &leagues);
    }

    pub fn remove_league_from_cache(&mut self, league_id: &str) {
        self.remove_from_collection(cache::LEAGUES, league_id);
    }

    pub fn update_match_cache(&mut self, m: &Match) {
        let Some(mut matches) = self.collection(cache::MATCHES) else { return };
        upsert(&mut matches, &m.id, normalize_match(m));
        self.set(cache::MATCHES, &matches);
    }

    pub fn remove_match_from_cache(&mut self, match_id: &str) {
        self.remove_from_collection(cache::MATCHES, match_id);
    }

    pub fn update_player_cache(&mut self, player: &Member) {
        let Some(mut players) = self.collection(cache::PLAYERS) else { return };
        let Some(mut value) = to_json(player) else { return };
        if let Value::Object(obj) = &mut value {
            obj.insert("name".to_string(), Value::from(player.display_name()));
            obj.insert("rating".to_string(), Value::from(player.rating.unwrap_or(0.0)));
        }
        upsert(&mut players, &player.id, value);
        self.set(cache::PLAYERS, &players);
    }

    // `key` picks an alternate board, e.g. a per-match MOTM tally.
    pub fn update_leaderboard_cache(
        &mut self,
        player_id: &str,
        value: u32,
        metric: LeaderboardMetric,
        key: Option<&str>,
    ) {
        let key = key.unwrap_or(cache::LEADERBOARD);
        let Some(mut rows) = self.collection(key) else { return };

        match position_by_id(&rows, player_id) {
            Some(i) => {
                if let Value::Object(row) = &mut rows[i] {
                    row.insert(metric.field().to_string(), Value::from(value));
                }
            }
            None => {
                let Some(mut row) = to_json(&LeaderboardRow {
                    id: player_id.to_string(),
                    ..LeaderboardRow::default()
                }) else {
                    return;
                };
                row[metric.field()] = Value::from(value);
                rows.push(row);
            }
        }
        self.set(key, &rows);
    }

    pub fn update_player_stats_cache(&mut self, player_id: &str, stats: Value) {
        let key = cache::player_stats_key(player_id);
        let Some(entry) = self.get_entry(&key) else {
            debug!(key = %key, "no cached stats to update");
            return;
        };
        let mut merged = entry.data;
        shallow_merge(&mut merged, stats);
        self.set(&key, &merged);
    }

    pub fn update_any_cache<T: Serialize + ?Sized>(&mut self, key: &str, data: &T) {
        self.set(key, data);
    }

    pub fn update_any_cache_with<T, F>(&mut self, key: &str, data: T, merge: F)
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T, T) -> T,
    {
        let next = match self.get::<T>(key) {
            Some(existing) => merge(existing, data),
            None => data,
        };
        self.set(key, &next);
    }

    fn collection(&mut self, key: &str) -> Option<Vec<Value>> {
        let entry = self.get_entry(key)?;
        match entry.data {
            Value::Array(items) => Some(items),
            _ => {
                debug!(key, "cached value is not a collection");
                None
            }
        }
    }

    fn remove_from_collection(&mut self, key: &str, id: &str) {
        let Some(mut items) = self.collection(key) else { return };
        let before = items.len();
        items.retain(|item| id_of(item) != Some(id));
        if items.len() != before {
            self.set(key, &items);
        }
    }
}

pub fn normalize_match(m: &Match) -> Value {
    let mut value = serde_json::to_value(m).unwrap_or(Value::Null);
    if let Value::Object(obj) = &mut value {
        obj.insert("homeTeamUsers".to_string(), roster_json(&m.home_team_users));
        obj.insert("awayTeamUsers".to_string(), roster_json(&m.away_team_users));
    }
    value
}

fn roster_json(members: &[Member]) -> Value {
    let entries: Vec<RosterEntry> = members.iter().map(RosterEntry::from).collect();
    serde_json::to_value(entries).unwrap_or_else(|_| Value::Array(Vec::new()))
}

fn upsert(items: &mut Vec<Value>, id: &str, value: Value) {
    match position_by_id(items, id) {
        Some(i) => shallow_merge(&mut items[i], value),
        None => items.push(value),
    }
}

fn position_by_id(items: &[Value], id: &str) -> Option<usize> {
    items.iter().position(|item| id_of(item) == Some(id))
}

fn id_of(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

fn to_json<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(err) => {
            debug!("cannot convert entity for cache: {err}");
            None
        }
    }
}
