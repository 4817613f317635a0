//! Interaction records and aggregate statistics.
//!
//! One record is written per successful model exchange. Records are
//! write-once; the store keys them by (`session_id`, `timestamp`), so the
//! timestamp string must sort lexicographically in chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One persisted prompt/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Partition key: the opaque session identifier.
    pub session_id: Uuid,
    /// Sort key: fixed-width ISO-8601 UTC timestamp.
    pub timestamp: String,
    /// Freshly generated per-record identifier.
    pub interaction_id: Uuid,
    /// Persona name in effect for the exchange.
    pub bot_name: String,
    pub prompt: String,
    pub response: String,
    /// Model identifier actually used (may differ from the persona default
    /// when the user overrides it).
    pub model: String,
    /// Recorded but never interpreted anywhere in the system.
    pub web_search_enabled: bool,
}

impl InteractionRecord {
    /// Build a record for an exchange that just completed, stamping it with
    /// a new interaction id and the current UTC time.
    pub fn new(
        session_id: Uuid,
        bot_name: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
        web_search_enabled: bool,
    ) -> Self {
        Self {
            session_id,
            timestamp: wire_timestamp(Utc::now()),
            interaction_id: Uuid::now_v7(),
            bot_name: bot_name.into(),
            prompt: prompt.into(),
            response: response.into(),
            model: model.into(),
            web_search_enabled,
        }
    }
}

/// Format a timestamp for use as the store's sort key.
///
/// Fixed-width microsecond precision with a trailing `Z`, so string order
/// equals chronological order.
pub fn wire_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Lifecycle status of the backing log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Creating,
    Active,
    Other(String),
}

impl TableStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATING" => TableStatus::Creating,
            "ACTIVE" => TableStatus::Active,
            other => TableStatus::Other(other.to_string()),
        }
    }
}

/// Aggregate counts over the whole log table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub distinct_sessions: u64,
    pub total_interactions: u64,
    /// Interaction count per persona name, sorted by name.
    pub by_persona: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(wire_timestamp(at), "2026-03-09T14:05:07.000000Z");
    }

    #[test]
    fn test_wire_timestamp_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(wire_timestamp(a).len(), wire_timestamp(b).len());
    }

    #[test]
    fn test_wire_timestamp_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2026, 3, 9, 9, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        assert!(wire_timestamp(early) < wire_timestamp(late));
    }

    #[test]
    fn test_new_record_generates_distinct_ids() {
        let session = Uuid::now_v7();
        let a = InteractionRecord::new(session, "Counselor", "p", "r", "m", false);
        let b = InteractionRecord::new(session, "Counselor", "p", "r", "m", false);
        assert_ne!(a.interaction_id, b.interaction_id);
        assert_eq!(a.session_id, b.session_id);
    }

    #[test]
    fn test_table_status_parse() {
        assert_eq!(TableStatus::parse("ACTIVE"), TableStatus::Active);
        assert_eq!(TableStatus::parse("CREATING"), TableStatus::Creating);
        assert_eq!(
            TableStatus::parse("DELETING"),
            TableStatus::Other("DELETING".to_string())
        );
    }
}
