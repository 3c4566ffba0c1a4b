pub mod cache;
pub mod cache_entities;
pub mod clock;
pub mod config;
pub mod demo_data;
pub mod file_store;
pub mod skill;
pub mod sqlite_store;
pub mod standings;
pub mod state;
pub mod store;
pub mod team_builder;
pub mod win_prob;

pub use cache::{CacheEntry, CacheStore};
pub use standings::compute_standings;
pub use team_builder::{BalanceError, move_player, shuffle_teams};
pub use win_prob::compute_win_probability;
