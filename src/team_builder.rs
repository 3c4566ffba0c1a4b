use crate::skill::skill_score;
use crate::state::{PlayerOption, Side};

pub const MIN_SHUFFLE_PLAYERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("Need at least 2 players to shuffle teams (found {found})")]
    TooFewPlayers { found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovedTeams {
    pub team_a: Vec<PlayerOption>,
    pub team_b: Vec<PlayerOption>,
    pub captain_a: Option<String>,
    pub captain_b: Option<String>,
}

/// Greedy snake split of both rosters by skill score, team A picking first.
pub fn shuffle_teams(
    team_a: &[PlayerOption],
    team_b: &[PlayerOption],
) -> Result<(Vec<PlayerOption>, Vec<PlayerOption>), BalanceError> {
    let found = team_a.len() + team_b.len();
    if found < MIN_SHUFFLE_PLAYERS {
        return Err(BalanceError::TooFewPlayers { found });
    }

    let mut pool: Vec<(u32, &PlayerOption)> = team_a
        .iter()
        .chain(team_b.iter())
        .map(|p| (skill_score(p), p))
        .collect();
    pool.sort_by(|a, b| b.0.cmp(&a.0));

    let mut next_a = Vec::with_capacity(found.div_ceil(2));
    let mut next_b = Vec::with_capacity(found / 2);
    for (i, (_, player)) in pool.into_iter().enumerate() {
        if i % 2 == 0 {
            next_a.push(player.clone());
        } else {
            next_b.push(player.clone());
        }
    }
    Ok((next_a, next_b))
}

pub fn move_player(
    player: &PlayerOption,
    to: Side,
    team_a: &[PlayerOption],
    team_b: &[PlayerOption],
    captain_a: Option<&str>,
    captain_b: Option<&str>,
) -> MovedTeams {
    let mut out = MovedTeams {
        team_a: team_a.to_vec(),
        team_b: team_b.to_vec(),
        captain_a: captain_a.map(str::to_string),
        captain_b: captain_b.map(str::to_string),
    };

    let (target, source, source_captain) = match to {
        Side::A => (&mut out.team_a, &mut out.team_b, &mut out.captain_b),
        Side::B => (&mut out.team_b, &mut out.team_a, &mut out.captain_a),
    };
    if target.iter().any(|p| p.id() == player.id()) {
        return out;
    }

    target.push(player.clone());
    source.retain(|p| p.id() != player.id());
    if source_captain.as_deref() == Some(player.id()) {
        *source_captain = None;
    }
    out
}
