use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_loader::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
}

impl Tally {
    /// A pair that has only ever drawn has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.wins == 0 && self.losses == 0
    }
}

/// Decisive results per ordered (coach, opponent) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHead {
    tallies: BTreeMap<(String, String), Tally>,
}

impl HeadToHead {
    pub fn get(&self, coach: &str, opponent: &str) -> Option<Tally> {
        self.tallies.get(&(coach.to_owned(), opponent.to_owned())).copied()
    }

    /// Every pair that has met, including pairs whose meetings were all draws.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Tally)> {
        self.tallies.iter().map(|((c, o), t)| (c.as_str(), o.as_str(), *t))
    }

    /// Pairs with at least one decisive result, which is what gets displayed.
    pub fn decisive(&self) -> impl Iterator<Item = (&str, &str, Tally)> {
        self.iter().filter(|(_, _, t)| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    fn entry(&mut self, coach: &str, opponent: &str) -> &mut Tally {
        self.tallies.entry((coach.to_owned(), opponent.to_owned())).or_default()
    }
}

// Draws make sure both directions exist but never move a counter.
pub fn compute_head_to_head(matches: &[MatchRecord]) -> HeadToHead {
    let mut h2h = HeadToHead::default();

    for m in matches {
        h2h.entry(&m.competitor_a, &m.competitor_b);
        h2h.entry(&m.competitor_b, &m.competitor_a);

        if let Some((winner, loser)) = m.winner_and_loser() {
            h2h.entry(winner, loser).wins += 1;
            h2h.entry(loser, winner).losses += 1;
        }
    }

    h2h
}
