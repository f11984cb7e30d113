//! League scoreboard for a fixed roster of coaches.
//!
//! Match results go into a [`MatchStore`]; the standings table and head-to-head records are
//! recomputed from the full match list every time the store changes.
//!
//! ```rust
//! use scoreboard::{compute_standings, MatchDocument, MatchRecord, ROSTER};
//!
//! let matches = vec![
//!     MatchRecord::from_document("1".into(), MatchDocument::new("ERON", "ARIN", 2, 1, "2025-05-01")),
//! ];
//! let table = compute_standings(&matches, &ROSTER);
//! assert_eq!(table[0].name, "ERON");
//! assert_eq!(table[0].points, 3);
//! ```

pub mod config;
pub mod data_loader;
pub mod error;
pub mod file_store;
pub mod gate;
pub mod head_to_head;
pub mod ranking;
pub mod ranking_context;
pub mod report;
pub mod scoreboard;
pub mod store;
pub mod subscription;

pub use data_loader::{MatchDocument, MatchId, MatchRecord, Outcome};
pub use error::{Error, Result, StoreError, ValidationError};
pub use file_store::JsonFileStore;
pub use gate::AdminGate;
pub use head_to_head::{compute_head_to_head, HeadToHead, Tally};
pub use ranking::{compute_standings, StandingsRow};
pub use ranking_context::ROSTER;
pub use scoreboard::{MatchForm, Scoreboard, ScoreboardView};
pub use store::{MatchStore, MemoryStore};
pub use subscription::Subscription;
