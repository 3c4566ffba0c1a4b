use crate::state::PlayerOption;

pub const GUEST_SCORE: u32 = 50;
pub const UNRATED_SCORE: u32 = 40;

// A missing attribute counts as 0 but still divides by six.
pub fn skill_score(player: &PlayerOption) -> u32 {
    if player.is_guest {
        return GUEST_SCORE;
    }
    let Some(skills) = player.member.skills.as_ref() else {
        return UNRATED_SCORE;
    };
    let values = skills.values();
    let sum: u32 = values.iter().sum();
    (sum as f64 / values.len() as f64).round() as u32
}

pub fn team_strength(roster: &[PlayerOption]) -> u32 {
    if roster.is_empty() {
        return 0;
    }
    let total: u32 = roster.iter().map(skill_score).sum();
    (total as f64 / roster.len() as f64).round() as u32
}
