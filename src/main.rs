use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use league_core::cache::CacheStore;
use league_core::clock::SystemClock;
use league_core::config::CacheConfig;
use league_core::demo_data::demo_league;
use league_core::skill::skill_score;
use league_core::standings::{compute_standings, ranked};
use league_core::state::{League, PlayerOption, SheetAction, TeamSheet, apply_action, or_default};

const USAGE: &str = "usage: league_core <standings FILE | balance FILE | demo [MEMBERS] [MATCHES] | cache-status | cache-clear>";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterFile {
    #[serde(default, deserialize_with = "or_default")]
    team_a: Vec<PlayerOption>,
    #[serde(default, deserialize_with = "or_default")]
    team_b: Vec<PlayerOption>,
}

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "league_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(std::env::args().skip(1).collect()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let Some(cmd) = args.first() else {
        bail!(USAGE);
    };
    match cmd.as_str() {
        "standings" => {
            let league: League = read_json(args.get(1))?;
            print_table(&league);
        }
        "balance" => {
            let roster: RosterFile = read_json(args.get(1))?;
            let mut sheet = TeamSheet::new(roster.team_a, roster.team_b);
            apply_action(&mut sheet, SheetAction::Shuffle)?;
            print_sheet(&sheet);
        }
        "demo" => {
            let members = parse_count(args.get(1), 10)?;
            let matches = parse_count(args.get(2), 24)?;
            let league = demo_league(&mut rand::thread_rng(), members, matches);
            print_table(&league);
        }
        "cache-status" => {
            let cache = CacheStore::open(CacheConfig::from_env(), Box::new(SystemClock))?;
            for (key, present) in cache.status() {
                println!("{key:<32} {}", if present { "cached" } else { "-" });
            }
        }
        "cache-clear" => {
            let mut cache = CacheStore::open(CacheConfig::from_env(), Box::new(SystemClock))?;
            cache.clear_all();
            println!("cleared");
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: Option<&String>) -> Result<T> {
    let path = path.map(PathBuf::from).ok_or_else(|| anyhow!(USAGE))?;
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse_count(raw: Option<&String>, default: usize) -> Result<usize> {
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("invalid count {raw:?}")),
        None => Ok(default),
    }
}

fn print_table(league: &League) {
    let rows = compute_standings(league);
    println!(
        "{:<7} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>5}",
        "Pos", "Name", "P", "W", "D", "L", "Pts", "Win%"
    );
    for (pos, row) in ranked(&rows) {
        let name = if row.is_admin {
            format!("{} (admin)", row.name)
        } else {
            row.name.clone()
        };
        println!(
            "{:<7} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>5}",
            pos.label(),
            name,
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.points(),
            row.win_percentage
        );
    }
}

fn print_sheet(sheet: &TeamSheet) {
    let m = sheet.matchup();
    for (label, roster, strength, win) in [
        ("Team A", &sheet.team_a, m.strength_a, m.win_a),
        ("Team B", &sheet.team_b, m.strength_b, m.win_b),
    ] {
        println!("{label}  strength {strength}  win {win}%");
        for p in roster {
            let guest = if p.is_guest { " (guest)" } else { "" };
            println!("  {:>3}  {}{guest}", skill_score(p), p.member.display_name());
        }
    }
}
