//! Aggregate statistics over scanned interaction records.

use std::collections::HashSet;

use haven_types::record::{InteractionRecord, UsageStats};

/// Compute distinct-session count, total record count, and per-persona
/// breakdown from a full-table scan.
pub fn compute_stats(records: &[InteractionRecord]) -> UsageStats {
    let mut stats = UsageStats::default();
    let mut sessions = HashSet::new();

    for record in records {
        sessions.insert(record.session_id);
        *stats.by_persona.entry(record.bot_name.clone()).or_insert(0) += 1;
    }

    stats.distinct_sessions = sessions.len() as u64;
    stats.total_interactions = records.len() as u64;
    stats
}
