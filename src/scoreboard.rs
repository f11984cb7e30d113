//! Presentation-side orchestration: validate input, pass the admin gate, talk to the store, and
//! recompute every view from the full match list whenever the store changes.

use std::sync::Arc;

use crate::data_loader::{MatchDocument, MatchId, MatchRecord};
use crate::error::{Result, StoreError, ValidationError};
use crate::gate::AdminGate;
use crate::head_to_head::{compute_head_to_head, HeadToHead};
use crate::ranking::{compute_standings, StandingsRow};
use crate::ranking_context::{is_on_roster, MAX_SCORE, ROSTER};
use crate::store::MatchStore;
use crate::subscription::Subscription;

/// Raw match input as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct MatchForm {
    pub competitor_a: String,
    pub competitor_b: String,
    pub score_a: String,
    pub score_b: String,
    pub date: String,
}

impl MatchForm {
    pub fn validate(&self, roster: &[impl AsRef<str>]) -> std::result::Result<MatchDocument, ValidationError> {
        let a = required("competitor_a", &self.competitor_a)?;
        let b = required("competitor_b", &self.competitor_b)?;
        if a == b {
            return Err(ValidationError::SameCompetitor);
        }
        for name in [a, b] {
            if !is_on_roster(roster, name) {
                return Err(ValidationError::UnknownCompetitor(name.to_owned()));
            }
        }

        let date = required("date", &self.date)?;
        let score_a = parse_score("score_a", &self.score_a)?;
        let score_b = parse_score("score_b", &self.score_b)?;

        Ok(MatchDocument::new(a, b, score_a, score_b, date))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> std::result::Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value)
}

fn parse_score(field: &'static str, raw: &str) -> std::result::Result<u32, ValidationError> {
    required(field, raw)?
        .parse::<u32>()
        .ok()
        .filter(|score| *score <= MAX_SCORE)
        .ok_or_else(|| ValidationError::InvalidScore { field, value: raw.to_owned() })
}

/// Everything the display needs, derived from one full snapshot of the store.
#[derive(Debug, Clone)]
pub struct ScoreboardView {
    pub standings: Vec<StandingsRow>,
    /// Newest first.
    pub history: Vec<MatchRecord>,
    pub head_to_head: HeadToHead,
}

impl ScoreboardView {
    pub fn from_matches(matches: &[MatchRecord], roster: &[impl AsRef<str>]) -> Self {
        Self {
            standings: compute_standings(matches, roster),
            history: matches.iter().rev().cloned().collect(),
            head_to_head: compute_head_to_head(matches),
        }
    }
}

pub struct Scoreboard<S: MatchStore> {
    store: Arc<S>,
    gate: AdminGate,
    roster: Vec<String>,
}

impl<S: MatchStore> Scoreboard<S> {
    pub fn new(store: Arc<S>, gate: AdminGate) -> Self {
        Self {
            store,
            gate,
            roster: ROSTER.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn record_match(&self, form: &MatchForm, passphrase: Option<&str>) -> Result<MatchId> {
        self.gate.check(passphrase)?;
        let document = form.validate(&self.roster)?;
        Ok(self.store.add_match(document)?)
    }

    pub fn delete_match(&self, id: &str, passphrase: Option<&str>) -> Result<()> {
        self.gate.check(passphrase)?;
        Ok(self.store.delete_match(id)?)
    }

    pub fn view(&self) -> Result<ScoreboardView> {
        let matches = self.store.list_matches()?;
        Ok(ScoreboardView::from_matches(&matches, &self.roster))
    }

    /// Calls `on_view` with a freshly computed view now and after every store change.
    pub fn watch<F, E>(&self, on_view: F, on_error: E) -> Subscription
    where
        F: Fn(&ScoreboardView) + Send + Sync + 'static,
        E: Fn(&StoreError) + Send + Sync + 'static,
    {
        let roster = self.roster.clone();
        self.store.subscribe(
            Box::new(move |matches: &[MatchRecord]| {
                on_view(&ScoreboardView::from_matches(matches, &roster));
            }),
            Box::new(move |e: &StoreError| {
                tracing::warn!(error = %e, "store subscription error");
                on_error(e);
            }),
        )
    }
}
