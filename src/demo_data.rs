use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::{League, Match, MatchStatus, Member, Skills};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Ben", "Cleo", "Dara", "Eli", "Fin", "Gus", "Hana", "Ivo", "Jude", "Kit", "Lena",
    "Milo", "Nia", "Oren", "Pia", "Quin", "Rae", "Sol", "Tess",
];
const LAST_NAMES: &[&str] = &[
    "Stone", "Vega", "Holt", "Nox", "Vale", "Rook", "Quinn", "Park", "Moss", "Noor", "Hale",
    "Ash",
];

pub fn demo_league(rng: &mut impl Rng, members: usize, matches: usize) -> League {
    let roster: Vec<Member> = (0..members).map(|i| demo_member(rng, i)).collect();
    let side = (roster.len() / 2).clamp(1, 5);

    let mut fixtures = Vec::with_capacity(matches);
    for i in 0..matches {
        let mut picked: Vec<Member> = roster.choose_multiple(rng, side * 2).cloned().collect();
        let away_team_users = picked.split_off(picked.len().min(side));
        let completed = rng.gen_bool(0.8);
        fixtures.push(Match {
            id: format!("m{}", i + 1),
            status: if completed {
                MatchStatus::Completed
            } else {
                MatchStatus::Scheduled
            },
            home_team_users: picked,
            away_team_users,
            home_team_goals: completed.then(|| rng.gen_range(0..=6)),
            away_team_goals: completed.then(|| rng.gen_range(0..=6)),
            ..Match::default()
        });
    }

    League {
        id: "demo".to_string(),
        name: Some("Demo League".to_string()),
        administrators: roster.first().cloned().into_iter().collect(),
        members: roster,
        matches: fixtures,
        ..League::default()
    }
}

pub fn demo_member(rng: &mut impl Rng, index: usize) -> Member {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index / FIRST_NAMES.len() + index) % LAST_NAMES.len()];
    // Some players never filled in their skills.
    let skills = rng.gen_bool(0.85).then(|| Skills {
        dribbling: Some(rng.gen_range(30..=95)),
        shooting: Some(rng.gen_range(30..=95)),
        passing: Some(rng.gen_range(30..=95)),
        pace: Some(rng.gen_range(30..=95)),
        defending: Some(rng.gen_range(30..=95)),
        physical: Some(rng.gen_range(30..=95)),
    });
    Member {
        id: format!("p{}", index + 1),
        first_name: first.to_string(),
        last_name: last.to_string(),
        profile_picture: None,
        skills,
        xp: rng.gen_range(0..500),
        ..Member::default()
    }
}
