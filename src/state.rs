use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::team_builder::{self, BalanceError};
use crate::win_prob::{self, Matchup};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub dribbling: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub shooting: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub passing: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub pace: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub defending: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub physical: Option<u32>,
}

impl Skills {
    pub fn values(&self) -> [u32; 6] {
        [
            self.dribbling.unwrap_or(0),
            self.shooting.unwrap_or(0),
            self.passing.unwrap_or(0),
            self.pace.unwrap_or(0),
            self.defending.unwrap_or(0),
            self.physical.unwrap_or(0),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    #[serde(default, deserialize_with = "whole_number")]
    pub xp: u32,
    // Only present on player-profile payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
    Other(String),
}

impl From<String> for MatchStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "scheduled" => MatchStatus::Scheduled,
            "completed" => MatchStatus::Completed,
            _ => MatchStatus::Other(raw),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        match status {
            MatchStatus::Scheduled => "scheduled".to_string(),
            MatchStatus::Completed => "completed".to_string(),
            MatchStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub status: MatchStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub home_team_users: Vec<Member>,
    #[serde(default, deserialize_with = "or_default")]
    pub away_team_users: Vec<Member>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub home_team_goals: Option<u32>,
    #[serde(default, deserialize_with = "opt_whole_number")]
    pub away_team_goals: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Match {
    pub fn final_score(&self) -> Option<(u32, u32)> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        let (Some(home), Some(away)) = (self.home_team_goals, self.away_team_goals) else {
            return None;
        };
        Some((home, away))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub members: Vec<Member>,
    #[serde(default, deserialize_with = "or_default")]
    pub matches: Vec<Match>,
    #[serde(default, deserialize_with = "or_default")]
    pub administrators: Vec<Member>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl League {
    pub fn admin_id(&self) -> Option<&str> {
        self.administrators.first().map(|a| a.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_percentage: String,
    pub is_admin: bool,
    pub xp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl TableRow {
    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOption {
    #[serde(flatten)]
    pub member: Member,
    #[serde(default, deserialize_with = "or_default")]
    pub is_guest: bool,
}

impl PlayerOption {
    pub fn member(member: Member) -> Self {
        Self {
            member,
            is_guest: false,
        }
    }

    pub fn guest(id: &str, first_name: &str) -> Self {
        Self {
            member: Member {
                id: id.to_string(),
                first_name: first_name.to_string(),
                ..Member::default()
            },
            is_guest: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.member.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSheet {
    #[serde(default, deserialize_with = "or_default")]
    pub team_a: Vec<PlayerOption>,
    #[serde(default, deserialize_with = "or_default")]
    pub team_b: Vec<PlayerOption>,
    #[serde(default)]
    pub captain_a: Option<String>,
    #[serde(default)]
    pub captain_b: Option<String>,
}

impl TeamSheet {
    pub fn new(team_a: Vec<PlayerOption>, team_b: Vec<PlayerOption>) -> Self {
        Self {
            team_a,
            team_b,
            captain_a: None,
            captain_b: None,
        }
    }

    pub fn roster(&self, side: Side) -> &[PlayerOption] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn captain(&self, side: Side) -> Option<&str> {
        match side {
            Side::A => self.captain_a.as_deref(),
            Side::B => self.captain_b.as_deref(),
        }
    }

    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if self.team_a.iter().any(|p| p.id() == player_id) {
            Some(Side::A)
        } else if self.team_b.iter().any(|p| p.id() == player_id) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn matchup(&self) -> Matchup {
        win_prob::matchup(&self.team_a, &self.team_b)
    }

    fn captain_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::A => &mut self.captain_a,
            Side::B => &mut self.captain_b,
        }
    }

    // A captain only stays valid while they are on their own side's roster.
    fn drop_stale_captains(&mut self) {
        for side in [Side::A, Side::B] {
            let keep = self
                .captain(side)
                .is_some_and(|id| self.roster(side).iter().any(|p| p.id() == id));
            if !keep {
                *self.captain_mut(side) = None;
            }
        }
    }
}

// `null` and a missing key both resolve to the default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_whole_number(deserializer)?.unwrap_or(0))
}

// Any JSON number, rounded and clamped into `u32`.
fn opt_whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, u32::MAX as f64) as u32))
}

#[derive(Debug, Clone)]
pub enum SheetAction {
    Shuffle,
    Move { player: PlayerOption, to: Side },
    SetCaptain { side: Side, player_id: Option<String> },
    Remove { player_id: String },
}

pub fn apply_action(sheet: &mut TeamSheet, action: SheetAction) -> Result<(), BalanceError> {
    match action {
        SheetAction::Shuffle => {
            let (team_a, team_b) = team_builder::shuffle_teams(&sheet.team_a, &sheet.team_b)?;
            sheet.team_a = team_a;
            sheet.team_b = team_b;
            sheet.drop_stale_captains();
        }
        SheetAction::Move { player, to } => {
            let moved = team_builder::move_player(
                &player,
                to,
                &sheet.team_a,
                &sheet.team_b,
                sheet.captain_a.as_deref(),
                sheet.captain_b.as_deref(),
            );
            sheet.team_a = moved.team_a;
            sheet.team_b = moved.team_b;
            sheet.captain_a = moved.captain_a;
            sheet.captain_b = moved.captain_b;
        }
        SheetAction::SetCaptain { side, player_id } => match player_id {
            Some(id) => {
                if sheet.roster(side).iter().any(|p| p.id() == id) {
                    *sheet.captain_mut(side) = Some(id);
                }
            }
            None => *sheet.captain_mut(side) = None,
        },
        SheetAction::Remove { player_id } => {
            sheet.team_a.retain(|p| p.id() != player_id);
            sheet.team_b.retain(|p| p.id() != player_id);
            sheet.drop_stale_captains();
        }
    }
    Ok(())
}
