use serde::Serialize;

use crate::data_loader::*;
use crate::ranking_context::*;

/// One competitor's line in the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRow {
    pub fn new(name: String) -> Self {
        Self {
            name,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

/// Builds the ranked table for `roster` from the full list of matches.
///
/// Every roster entry gets a row, played or not. Matches naming someone outside the roster are
/// skipped. The table is sorted by points, then goal difference, then goals scored; anything still
/// tied stays in roster order.
pub fn compute_standings(matches: &[MatchRecord], roster: &[impl AsRef<str>]) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = roster.iter()
        .map(|name| StandingsRow::new(name.as_ref().to_owned()))
        .collect();

    for m in matches {
        apply_match(m, &mut rows);
    }

    // Derived columns come from the final counters only
    for row in rows.iter_mut() {
        row.goal_difference = row.goals_for as i64 - row.goals_against as i64;
        row.points = row.wins * POINTS_PER_WIN + row.draws * POINTS_PER_DRAW;
    }

    // sort_by is stable, which keeps roster order for full ties
    rows.sort_by(|x, y| {
        y.points.cmp(&x.points)
            .then(y.goal_difference.cmp(&x.goal_difference))
            .then(y.goals_for.cmp(&x.goals_for))
    });

    rows
}

fn apply_match(m: &MatchRecord, rows: &mut [StandingsRow]) {
    let a_idx = rows.iter().position(|r| r.name == m.competitor_a);
    let b_idx = rows.iter().position(|r| r.name == m.competitor_b);

    let (a_idx, b_idx) = match (a_idx, b_idx) {
        (Some(a), Some(b)) if a != b => (a, b),
        _ => {
            tracing::debug!(
                id = %m.id,
                competitor_a = %m.competitor_a,
                competitor_b = %m.competitor_b,
                "match not counted in standings"
            );
            return;
        }
    };

    let a = &mut rows[a_idx];
    a.games_played += 1;
    a.goals_for += u64::from(m.score_a);
    a.goals_against += u64::from(m.score_b);

    let b = &mut rows[b_idx];
    b.games_played += 1;
    b.goals_for += u64::from(m.score_b);
    b.goals_against += u64::from(m.score_a);

    match m.outcome() {
        Outcome::WinA => {
            rows[a_idx].wins += 1;
            rows[b_idx].losses += 1;
        }
        Outcome::WinB => {
            rows[b_idx].wins += 1;
            rows[a_idx].losses += 1;
        }
        Outcome::Draw => {
            rows[a_idx].draws += 1;
            rows[b_idx].draws += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn m(a: &str, b: &str, sa: u32, sb: u32) -> MatchRecord {
        MatchRecord {
            id: format!("{a}-{b}-{sa}-{sb}"),
            competitor_a: a.to_owned(),
            competitor_b: b.to_owned(),
            score_a: sa,
            score_b: sb,
            date: "2025-01-01".to_owned(),
            recorded_at: String::new(),
        }
    }

    fn row<'a>(rows: &'a [StandingsRow], name: &str) -> &'a StandingsRow {
        rows.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn three_match_league() {
        let matches = vec![
            m("ERON", "ARIN", 2, 1),
            m("ARIN", "LAWIN", 0, 0),
            m("LAWIN", "ERON", 3, 3),
        ];
        let rows = compute_standings(&matches, &ROSTER);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ERON", "LAWIN", "ARIN"]);

        let eron = row(&rows, "ERON");
        assert_eq!((eron.games_played, eron.wins, eron.draws, eron.losses), (2, 1, 1, 0));
        assert_eq!((eron.goals_for, eron.goals_against, eron.goal_difference, eron.points), (5, 4, 1, 4));

        let arin = row(&rows, "ARIN");
        assert_eq!((arin.games_played, arin.wins, arin.draws, arin.losses), (2, 0, 1, 1));
        assert_eq!((arin.goals_for, arin.goals_against, arin.goal_difference, arin.points), (1, 2, -1, 1));

        let lawin = row(&rows, "LAWIN");
        assert_eq!((lawin.games_played, lawin.wins, lawin.draws, lawin.losses), (2, 0, 2, 0));
        assert_eq!((lawin.goals_for, lawin.goals_against, lawin.goal_difference, lawin.points), (3, 3, 0, 2));
    }

    #[test]
    fn no_matches_gives_zero_rows_in_roster_order() {
        let rows = compute_standings(&[], &ROSTER);

        assert_eq!(rows.len(), 3);
        for (r, name) in rows.iter().zip(ROSTER) {
            assert_eq!(*r, StandingsRow::new(name.to_owned()));
        }
    }

    #[test]
    fn unknown_competitor_is_skipped_and_later_matches_still_count() {
        let matches = vec![
            m("ERON", "GHOST", 5, 0),
            m("ARIN", "ERON", 1, 0),
        ];
        let rows = compute_standings(&matches, &ROSTER);

        assert_eq!(rows[0].name, "ARIN");
        assert_eq!(row(&rows, "ERON").games_played, 1);
        assert_eq!(row(&rows, "ERON").goals_for, 0);
    }

    #[test]
    fn ties_break_on_difference_then_goals_for_then_roster() {
        // ARIN and LAWIN both win once 1-0 against ERON: full tie, roster order holds
        let rows = compute_standings(&[m("LAWIN", "ERON", 1, 0), m("ARIN", "ERON", 1, 0)], &ROSTER);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ARIN", "LAWIN", "ERON"]);

        // Same points, LAWIN has the better difference
        let rows = compute_standings(&[m("ARIN", "ERON", 1, 0), m("LAWIN", "ERON", 3, 0)], &ROSTER);
        assert_eq!(rows[0].name, "LAWIN");

        // Same points and difference, LAWIN scored more
        let rows = compute_standings(&[m("ARIN", "ERON", 1, 0), m("LAWIN", "ERON", 4, 3)], &ROSTER);
        assert_eq!(rows[0].name, "LAWIN");
        assert_eq!(rows[1].name, "ARIN");
    }

    #[test]
    fn maximal_scores_accumulate_without_overflow() {
        let big = m("ERON", "ARIN", u32::MAX, 0);
        let rows = compute_standings(&[big.clone(), big], &ROSTER);

        let eron = row(&rows, "ERON");
        assert_eq!(eron.goals_for, 2 * u64::from(u32::MAX));
        assert_eq!(eron.goal_difference, 2 * i64::from(u32::MAX));
        assert_eq!(row(&rows, "ARIN").goal_difference, -2 * i64::from(u32::MAX));
    }

    #[test]
    fn custom_roster_is_respected() {
        let roster = vec!["B".to_string(), "A".to_string()];
        let rows = compute_standings(&[m("A", "C", 1, 0)], &roster);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert!(rows.iter().all(|r| r.games_played == 0));
    }

    #[test]
    fn random_tables_stay_consistent() {
        let pool = ["ERON", "ARIN", "LAWIN", "OUTSIDER"];
        let mut rng = StdRng::seed_from_u64(20250301);

        for _ in 0..200 {
            let count = rng.random_range(0..30);
            let mut matches = Vec::with_capacity(count);
            for _ in 0..count {
                let a = pool[rng.random_range(0..pool.len())];
                let mut b = pool[rng.random_range(0..pool.len())];
                while b == a {
                    b = pool[rng.random_range(0..pool.len())];
                }
                matches.push(m(a, b, rng.random_range(0..6), rng.random_range(0..6)));
            }

            let rows = compute_standings(&matches, &ROSTER);
            assert_eq!(rows.len(), ROSTER.len());
            for name in ROSTER {
                assert_eq!(rows.iter().filter(|r| r.name == name).count(), 1);
            }

            let counted: Vec<&MatchRecord> = matches.iter()
                .filter(|m| is_on_roster(&ROSTER, &m.competitor_a) && is_on_roster(&ROSTER, &m.competitor_b))
                .collect();
            let decisive = counted.iter().filter(|m| m.outcome() != Outcome::Draw).count() as u32;
            let drawn = counted.len() as u32 - decisive;

            let wins: u32 = rows.iter().map(|r| r.wins).sum();
            let losses: u32 = rows.iter().map(|r| r.losses).sum();
            let draws: u32 = rows.iter().map(|r| r.draws).sum();
            assert_eq!(wins, decisive);
            assert_eq!(losses, decisive);
            assert_eq!(draws, 2 * drawn);
            assert_eq!(wins + draws / 2, counted.len() as u32);

            for r in &rows {
                assert_eq!(r.games_played, r.wins + r.losses + r.draws);
                assert_eq!(r.goal_difference, r.goals_for as i64 - r.goals_against as i64);
                assert_eq!(r.points, r.wins * 3 + r.draws);
            }

            for pair in rows.windows(2) {
                let (x, y) = (&pair[0], &pair[1]);
                let key_x = (x.points, x.goal_difference, x.goals_for);
                let key_y = (y.points, y.goal_difference, y.goals_for);
                assert!(key_x >= key_y);
                if key_x == key_y {
                    let pos = |n: &str| ROSTER.iter().position(|r| *r == n).unwrap();
                    assert!(pos(&x.name) < pos(&y.name));
                }
            }
        }
    }
}
