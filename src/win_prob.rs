use crate::skill::team_strength;
use crate::state::PlayerOption;

const EVEN: u32 = 50;
const FLOOR: f64 = 15.0;
const CEILING: f64 = 85.0;
// Percentage points gained per 100 points of strength difference.
const SWING: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    pub strength_a: u32,
    pub strength_b: u32,
    pub win_a: u32,
    pub win_b: u32,
}

// Call once per side with the operands swapped; the pair only sums to 100 when
// neither strength is zero.
pub fn compute_win_probability(own: u32, opponent: u32) -> u32 {
    match (own, opponent) {
        (0, 0) => EVEN,
        (_, 0) => CEILING as u32,
        (0, _) => FLOOR as u32,
        _ => {
            let diff = own as f64 - opponent as f64;
            (EVEN as f64 + diff / 100.0 * SWING)
                .clamp(FLOOR, CEILING)
                .round() as u32
        }
    }
}

pub fn matchup(team_a: &[PlayerOption], team_b: &[PlayerOption]) -> Matchup {
    let strength_a = team_strength(team_a);
    let strength_b = team_strength(team_b);
    Matchup {
        strength_a,
        strength_b,
        win_a: compute_win_probability(strength_a, strength_b),
        win_b: compute_win_probability(strength_b, strength_a),
    }
}
