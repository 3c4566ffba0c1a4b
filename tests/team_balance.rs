use std::fs;
use std::path::PathBuf;

use league_core::skill::{skill_score, team_strength};
use league_core::state::{
    Member, PlayerOption, SheetAction, Side, Skills, TeamSheet, apply_action,
};
use league_core::team_builder::{BalanceError, move_player, shuffle_teams};
use league_core::win_prob::compute_win_probability;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterFile {
    team_a: Vec<PlayerOption>,
    team_b: Vec<PlayerOption>,
}

fn rated(id: &str, all: u32) -> PlayerOption {
    PlayerOption::member(Member {
        id: id.to_string(),
        skills: Some(Skills {
            dribbling: Some(all),
            shooting: Some(all),
            passing: Some(all),
            pace: Some(all),
            defending: Some(all),
            physical: Some(all),
        }),
        ..Member::default()
    })
}

fn ids(team: &[PlayerOption]) -> Vec<&str> {
    team.iter().map(|p| p.id()).collect()
}

#[test]
fn snake_split_alternates_from_strongest() {
    let roster: RosterFile =
        serde_json::from_str(&read_fixture("roster_four.json")).expect("fixture should parse");
    let scores: Vec<u32> = roster
        .team_a
        .iter()
        .chain(roster.team_b.iter())
        .map(skill_score)
        .collect();
    assert_eq!(scores, vec![90, 60, 70, 80]);

    let (a, b) = shuffle_teams(&roster.team_a, &roster.team_b).unwrap();
    let score_of = |t: &[PlayerOption]| t.iter().map(skill_score).collect::<Vec<_>>();
    assert_eq!(score_of(&a), vec![90, 70]);
    assert_eq!(score_of(&b), vec![80, 60]);
}

#[test]
fn odd_pool_gives_team_a_the_extra_player() {
    let (a, b) = shuffle_teams(
        &[rated("a", 50), rated("b", 40)],
        &[rated("c", 70), rated("d", 60), rated("e", 30)],
    )
    .unwrap();
    assert_eq!(ids(&a), vec!["c", "a", "e"]);
    assert_eq!(ids(&b), vec!["d", "b"]);
}

#[test]
fn guest_and_unrated_players_use_default_scores() {
    let mut guest: PlayerOption = serde_json::from_str(
        r#"{"id":"g","firstName":"Guest","isGuest":true,"skills":{"pace":99}}"#,
    )
    .unwrap();
    assert!(guest.is_guest);
    assert_eq!(skill_score(&guest), 50);

    guest.is_guest = false;
    // A partly filled skills block still divides by six.
    assert_eq!(skill_score(&guest), 17);

    let unrated = PlayerOption::member(Member {
        id: "u".to_string(),
        ..Member::default()
    });
    assert_eq!(skill_score(&unrated), 40);

    let (a, b) = shuffle_teams(&[unrated.clone()], &[PlayerOption::guest("g2", "Sam")]).unwrap();
    assert_eq!(ids(&a), vec!["g2"]);
    assert_eq!(ids(&b), vec!["u"]);
}

#[test]
fn reference_skill_line_scores_68() {
    let p: PlayerOption = serde_json::from_str(
        r#"{"id":"p","skills":{"dribbling":80,"shooting":60,"passing":70,"pace":90,"defending":50,"physical":60}}"#,
    )
    .unwrap();
    assert_eq!(skill_score(&p), 68);
}

#[test]
fn strength_and_probability_edges() {
    assert_eq!(team_strength(&[]), 0);
    assert_eq!(team_strength(&[rated("a", 90), rated("b", 71)]), 81);
    assert_eq!(compute_win_probability(0, 0), 50);
    assert_eq!(compute_win_probability(70, 0), 85);
    assert_eq!(compute_win_probability(0, 70), 15);
    assert_eq!(compute_win_probability(80, 50), 59);
}

#[test]
fn shuffle_needs_two_players() {
    assert_eq!(
        shuffle_teams(&[], &[rated("a", 10)]),
        Err(BalanceError::TooFewPlayers { found: 1 })
    );
    assert!(shuffle_teams(&[rated("a", 10)], &[rated("b", 10)]).is_ok());
}

#[test]
fn drag_between_teams() {
    let team_a = vec![rated("a", 90), rated("b", 80)];
    let team_b = vec![rated("c", 70)];

    let moved = move_player(&team_a[0], Side::B, &team_a, &team_b, Some("a"), None);
    assert_eq!(ids(&moved.team_a), vec!["b"]);
    assert_eq!(ids(&moved.team_b), vec!["c", "a"]);
    assert_eq!(moved.captain_a, None);

    let again = move_player(
        &team_a[0],
        Side::B,
        &moved.team_a,
        &moved.team_b,
        moved.captain_a.as_deref(),
        moved.captain_b.as_deref(),
    );
    assert_eq!(again, moved);

    // A player from outside both rosters is simply added.
    let fresh = move_player(&rated("z", 1), Side::A, &team_a, &team_b, Some("b"), Some("c"));
    assert_eq!(ids(&fresh.team_a), vec!["a", "b", "z"]);
    assert_eq!(fresh.captain_a.as_deref(), Some("b"));
    assert_eq!(fresh.captain_b.as_deref(), Some("c"));
}

#[test]
fn sheet_actions_drive_the_builder() {
    let mut sheet = TeamSheet::new(
        vec![rated("a", 90), rated("b", 60)],
        vec![rated("c", 70), rated("d", 80)],
    );
    apply_action(
        &mut sheet,
        SheetAction::SetCaptain {
            side: Side::A,
            player_id: Some("b".to_string()),
        },
    )
    .unwrap();
    apply_action(&mut sheet, SheetAction::Shuffle).unwrap();
    assert_eq!(ids(&sheet.team_a), vec!["a", "c"]);
    // b ended up on team B, so team A needs a new captain.
    assert_eq!(sheet.captain_a, None);

    let m = sheet.matchup();
    assert_eq!((m.strength_a, m.strength_b), (80, 70));
    assert_eq!((m.win_a, m.win_b), (53, 47));

    let d = sheet.team_b[0].clone();
    apply_action(&mut sheet, SheetAction::Move { player: d, to: Side::A }).unwrap();
    assert_eq!(sheet.side_of("d"), Some(Side::A));
    assert_eq!(sheet.roster(Side::B).len(), 1);
}
