use serde::Serialize;
use std::fmt::Write;

use crate::data_loader::MatchRecord;
use crate::error::Result;
use crate::head_to_head::HeadToHead;
use crate::ranking::StandingsRow;
use crate::scoreboard::ScoreboardView;

pub fn render_table(rows: &[StandingsRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "|{0:>4} | {1:10} | {2:>4} | {3:>3} | {4:>4} | {5:>4} | {6:>3} | {7:>3} | {8:>4} | {9:>5} |",
        "Rank", "Coach", "Game", "Win", "Lose", "Draw", "GA", "GF", "Diff", "Point");

    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(out, "|{0:>4} | {1:10} | {2:>4} | {3:>3} | {4:>4} | {5:>4} | {6:>3} | {7:>3} | {8:>4} | {9:>5} |",
            i + 1,
            r.name,
            r.games_played,
            r.wins,
            r.losses,
            r.draws,
            r.goals_against,
            r.goals_for,
            r.goal_difference,
            r.points,
        );
    }

    out
}

// Expects matches newest first, as ScoreboardView::history holds them
pub fn render_history(history: &[MatchRecord]) -> String {
    if history.is_empty() {
        return "No matches recorded yet.\n".to_string();
    }

    let mut out = String::new();
    for m in history {
        let matchup = format!("{} vs {}", m.competitor_a, m.competitor_b);
        let score = format!("{}-{}", m.score_a, m.score_b);
        let _ = writeln!(out, "| {0:12} | {1:16} | {2:>7} | {3}", m.date, matchup, score, m.id);
    }

    out
}

pub fn render_head_to_head(h2h: &HeadToHead) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {0:10} | {1:10} | {2:>4} | {3:>6} |", "Coach", "Opponent", "Wins", "Losses");

    for (coach, opponent, tally) in h2h.decisive() {
        let _ = writeln!(out, "| {0:10} | {1:10} | {2:>4} | {3:>6} |", coach, opponent, tally.wins, tally.losses);
    }

    out
}

pub fn output_report(view: &ScoreboardView) {
    println!("League table");
    print!("{}", render_table(&view.standings));
    println!();
    println!("History");
    print!("{}", render_history(&view.history));
    println!();
    println!("Head to head");
    print!("{}", render_head_to_head(&view.head_to_head));
}

#[derive(Serialize)]
struct JsonStandingsRow<'a> {
    rank: usize,
    #[serde(flatten)]
    row: &'a StandingsRow,
}

#[derive(Serialize)]
struct JsonTally<'a> {
    coach: &'a str,
    opponent: &'a str,
    wins: u32,
    losses: u32,
}

pub fn standings_json(rows: &[StandingsRow]) -> Result<String> {
    let ranked: Vec<JsonStandingsRow> = rows.iter()
        .enumerate()
        .map(|(i, row)| JsonStandingsRow { rank: i + 1, row })
        .collect();

    Ok(serde_json::to_string_pretty(&ranked)?)
}

pub fn history_json(history: &[MatchRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(history)?)
}

pub fn head_to_head_json(h2h: &HeadToHead) -> Result<String> {
    let tallies: Vec<JsonTally> = h2h.decisive()
        .map(|(coach, opponent, t)| JsonTally { coach, opponent, wins: t.wins, losses: t.losses })
        .collect();

    Ok(serde_json::to_string_pretty(&tallies)?)
}

pub fn standings_csv(rows: &[StandingsRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
