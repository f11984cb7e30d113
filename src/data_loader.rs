use serde::*;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

/// Store-assigned match identifier. Opaque to everything but the store.
pub type MatchId = String;

// Reads the raw store file. A file that does not exist yet reads as empty.
pub fn read_raw(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

// Parses the store file into its raw documents, in the order they were written (creation order).
// Documents without an id (the old layout kept the id outside the document) get `legacy-<index>`, so
// every document can be addressed and the id sticks once the file is written back.
pub fn parse_documents(data: &str) -> Result<Vec<serde_json::Value>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut documents: Vec<serde_json::Value> = serde_json::from_str(data)?;
    for (index, document) in documents.iter_mut().enumerate() {
        if let Some(fields) = document.as_object_mut() {
            if !fields.contains_key("id") {
                fields.insert("id".to_owned(), serde_json::Value::String(format!("legacy-{index}")));
            }
        }
    }

    Ok(documents)
}

// Documents that don't decode (a score that isn't a number, a missing competitor) are skipped with a
// warning instead of failing the whole collection. They stay in the raw list untouched.
pub fn decode_documents(documents: &[serde_json::Value]) -> Vec<MatchRecord> {
    documents.iter()
        .filter_map(|document| match MatchRecord::deserialize(document) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, id = ?document.get("id"), "skipping undecodable match document");
                None
            }
        })
        .collect()
}

pub fn load_documents(data: &str) -> Result<Vec<MatchRecord>> {
    Ok(decode_documents(&parse_documents(data)?))
}

// Returns the exact text written, so callers can tell their own writes apart from someone else's.
pub fn save_data(file_path: &Path, documents: &[serde_json::Value]) -> Result<String> {
    let data = serde_json::to_string_pretty(documents)?;

    // Write next to the target and rename, so readers never see a half-written file
    let tmp_path = file_path.with_extension("json.tmp");
    fs::write(&tmp_path, &data)?;
    fs::rename(&tmp_path, file_path)?;

    Ok(data)
}

/// A new match as submitted for storage, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDocument {
    pub competitor_a: String,
    pub competitor_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub date: String,
    pub recorded_at: String,
}

impl MatchDocument {
    pub fn new(competitor_a: &str, competitor_b: &str, score_a: u32, score_b: u32, date: &str) -> Self {
        Self {
            competitor_a: competitor_a.to_owned(),
            competitor_b: competitor_b.to_owned(),
            score_a,
            score_b,
            date: date.to_owned(),
            recorded_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// Scores are persisted as decimal text. Reading goes through deserialize_number_from_string, so plain
// JSON numbers are accepted too. The p1/p2/s1/s2/savedAt aliases cover documents written by the old layout.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    #[serde(alias = "p1")]
    pub competitor_a: String,
    #[serde(alias = "p2")]
    pub competitor_b: String,
    #[serde(alias = "s1")]
    #[serde(deserialize_with = "deserialize_number_from_string", serialize_with = "serialize_as_string")]
    pub score_a: u32,
    #[serde(alias = "s2")]
    #[serde(deserialize_with = "deserialize_number_from_string", serialize_with = "serialize_as_string")]
    pub score_b: u32,
    #[serde(default = "empty_string")]
    pub date: String,
    #[serde(alias = "savedAt", default = "empty_string")]
    pub recorded_at: String,
}

/// Result of a single match from competitor A's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WinA,
    WinB,
    Draw,
}

impl MatchRecord {
    pub fn from_document(id: MatchId, document: MatchDocument) -> Self {
        Self {
            id,
            competitor_a: document.competitor_a,
            competitor_b: document.competitor_b,
            score_a: document.score_a,
            score_b: document.score_b,
            date: document.date,
            recorded_at: document.recorded_at,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.score_a.cmp(&self.score_b) {
            Ordering::Greater => Outcome::WinA,
            Ordering::Less => Outcome::WinB,
            Ordering::Equal => Outcome::Draw,
        }
    }

    /// Winner and loser names, or `None` for a draw.
    pub fn winner_and_loser(&self) -> Option<(&str, &str)> {
        match self.outcome() {
            Outcome::WinA => Some((&self.competitor_a, &self.competitor_b)),
            Outcome::WinB => Some((&self.competitor_b, &self.competitor_a)),
            Outcome::Draw => None,
        }
    }
}

fn serialize_as_string<S>(value: &u32, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

fn empty_string() -> String { "".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_round_trip_as_text() {
        let m = MatchRecord::from_document("abc".into(), MatchDocument::new("ERON", "ARIN", 2, 1, "2025-03-01"));
        let json = serde_json::to_value(&m).unwrap();

        assert_eq!(json["scoreA"], "2");
        assert_eq!(json["scoreB"], "1");
        assert_eq!(json["competitorA"], "ERON");
        assert!(json.get("recordedAt").is_some());
    }

    #[test]
    fn accepts_numeric_scores_and_legacy_names() {
        let data = r#"[
            {"id": "a", "p1": "ERON", "p2": "ARIN", "s1": "4", "s2": 2, "date": "2025-01-01", "savedAt": "x"},
            {"id": "b", "competitorA": "ARIN", "competitorB": "LAWIN", "scoreA": 0, "scoreB": "0"}
        ]"#;
        let matches = load_documents(data).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].competitor_a, "ERON");
        assert_eq!(matches[0].score_a, 4);
        assert_eq!(matches[0].score_b, 2);
        assert_eq!(matches[0].recorded_at, "x");
        assert_eq!(matches[1].date, "");
        assert_eq!(matches[1].outcome(), Outcome::Draw);
    }

    #[test]
    fn skips_documents_with_bad_scores() {
        let data = r#"[
            {"id": "a", "competitorA": "ERON", "competitorB": "ARIN", "scoreA": "abc", "scoreB": "1"},
            {"id": "b", "competitorA": "ERON", "competitorB": "ARIN", "scoreA": "-2", "scoreB": "1"},
            {"id": "c", "competitorA": "ERON", "competitorB": "ARIN", "scoreA": "3", "scoreB": "1"}
        ]"#;
        let matches = load_documents(data).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "c");
    }

    #[test]
    fn empty_input_is_empty_collection() {
        assert!(load_documents("").unwrap().is_empty());
        assert!(load_documents("[]").unwrap().is_empty());
        assert!(load_documents("{").is_err());
    }

    #[test]
    fn winner_and_loser_follow_the_score() {
        let m = MatchRecord::from_document("x".into(), MatchDocument::new("ARIN", "ERON", 0, 3, "d"));

        assert_eq!(m.outcome(), Outcome::WinB);
        assert_eq!(m.winner_and_loser(), Some(("ERON", "ARIN")));
    }

    #[test]
    fn documents_without_id_get_a_positional_one() {
        let data = r#"[
            {"p1": "ERON", "p2": "ARIN", "s1": "2", "s2": "1"},
            {"id": "kept", "p1": "ARIN", "p2": "LAWIN", "s1": "0", "s2": "0"},
            {"p1": "LAWIN", "p2": "ERON", "s1": "1.5", "s2": "1"}
        ]"#;
        let documents = parse_documents(data).unwrap();

        assert_eq!(documents[0]["id"], "legacy-0");
        assert_eq!(documents[1]["id"], "kept");
        assert_eq!(documents[2]["id"], "legacy-2");

        let matches = decode_documents(&documents);
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["legacy-0", "kept"]);
        assert_eq!(matches[0].score_a, 2);
    }
}
