use std::cmp::Ordering;
use std::collections::HashMap;

use crate::state::{League, Member, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Gold,
    Silver,
    Bronze,
    Rank(usize),
}

impl Position {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Position::Gold,
            2 => Position::Silver,
            3 => Position::Bronze,
            n => Position::Rank(n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Position::Gold => "gold".to_string(),
            Position::Silver => "silver".to_string(),
            Position::Bronze => "bronze".to_string(),
            Position::Rank(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Draw,
    Loss,
}

pub fn compute_standings(league: &League) -> Vec<TableRow> {
    let admin_id = league.admin_id();
    let mut rows: Vec<TableRow> = Vec::with_capacity(league.members.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(league.members.len());

    for member in &league.members {
        if index.contains_key(member.id.as_str()) {
            continue;
        }
        index.insert(member.id.as_str(), rows.len());
        rows.push(empty_row(member, admin_id == Some(member.id.as_str())));
    }

    for m in &league.matches {
        let Some((home_goals, away_goals)) = m.final_score() else {
            continue;
        };
        let (home, away) = match home_goals.cmp(&away_goals) {
            Ordering::Greater => (Outcome::Win, Outcome::Loss),
            Ordering::Less => (Outcome::Loss, Outcome::Win),
            Ordering::Equal => (Outcome::Draw, Outcome::Draw),
        };

        for player in &m.home_team_users {
            if let Some(&i) = index.get(player.id.as_str()) {
                record(&mut rows[i], home);
            }
        }
        for player in &m.away_team_users {
            if let Some(&i) = index.get(player.id.as_str()) {
                record(&mut rows[i], away);
            }
        }
    }

    for row in &mut rows {
        row.win_percentage = win_percentage(row.wins, row.played);
    }

    // Stable: rows level on all three keys keep member order.
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.draws.cmp(&a.draws))
            .then(a.losses.cmp(&b.losses))
    });
    rows
}

pub fn win_percentage(wins: u32, played: u32) -> String {
    if played == 0 {
        return "0%".to_string();
    }
    let pct = (wins as f64 / played as f64 * 100.0).round() as u32;
    format!("{pct}%")
}

pub fn ranked(rows: &[TableRow]) -> Vec<(Position, &TableRow)> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| (Position::for_rank(i + 1), row))
        .collect()
}

fn empty_row(member: &Member, is_admin: bool) -> TableRow {
    TableRow {
        id: member.id.clone(),
        name: member.display_name(),
        played: 0,
        wins: 0,
        draws: 0,
        losses: 0,
        win_percentage: "0%".to_string(),
        is_admin,
        xp: member.xp,
        profile_picture: member.profile_picture.clone(),
    }
}

fn record(row: &mut TableRow, outcome: Outcome) {
    row.played += 1;
    match outcome {
        Outcome::Win => row.wins += 1,
        Outcome::Draw => row.draws += 1,
        Outcome::Loss => row.losses += 1,
    }
}
