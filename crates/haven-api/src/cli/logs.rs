//! Log inspection command: recent records, per-session view, statistics.
//!
//! Read-only against the interaction-log table. Per-session queries come
//! back descending by timestamp straight from the store; the recent view
//! is an unordered bounded scan.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use haven_core::audit::stats::compute_stats;
use haven_core::audit::InteractionStore;
use haven_types::record::InteractionRecord;

use crate::state::AppState;

/// What `haven logs [target]` should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsTarget {
    /// No argument: recent records from an unordered bounded scan.
    Recent,
    /// The literal argument `stats`: aggregate counts.
    Stats,
    /// Any other argument: records for one session.
    Session(Uuid),
}

impl LogsTarget {
    pub fn from_arg(arg: Option<&str>) -> Result<Self> {
        match arg {
            None => Ok(LogsTarget::Recent),
            Some("stats") => Ok(LogsTarget::Stats),
            Some(other) => {
                let session_id = Uuid::parse_str(other)
                    .with_context(|| format!("'{other}' is not a valid session id"))?;
                Ok(LogsTarget::Session(session_id))
            }
        }
    }
}

pub async fn run(state: &AppState, target: LogsTarget, limit: u32, json: bool) -> Result<()> {
    match target {
        LogsTarget::Recent => {
            let records = state.store.scan(Some(limit)).await?;
            print_records(&records, "Recent interactions", json)
        }
        LogsTarget::Session(session_id) => {
            let records = state.store.recent_for_session(&session_id, limit).await?;
            print_records(&records, &format!("Session {session_id}"), json)
        }
        LogsTarget::Stats => {
            let records = state.store.scan(None).await?;
            let stats = compute_stats(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!();
            println!("  {}", style("Interaction statistics").bold());
            println!();
            println!(
                "  Distinct sessions:  {}",
                style(stats.distinct_sessions).cyan()
            );
            println!(
                "  Total interactions: {}",
                style(stats.total_interactions).cyan()
            );
            if !stats.by_persona.is_empty() {
                println!();
                println!("  By persona:");
                for (persona, count) in &stats.by_persona {
                    println!("    {persona}: {count}");
                }
            }
            println!();
            Ok(())
        }
    }
}

fn print_records(records: &[InteractionRecord], heading: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!("  {} No interactions found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Session").fg(Color::White),
        Cell::new("Bot").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Prompt").fg(Color::White),
        Cell::new("Response").fg(Color::White),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.timestamp).fg(Color::DarkGrey),
            Cell::new(short_id(&record.session_id)).fg(Color::DarkGrey),
            Cell::new(&record.bot_name).fg(Color::Cyan),
            Cell::new(truncate(&record.model, 30)).fg(Color::DarkGrey),
            Cell::new(truncate(&record.prompt, 40)).fg(Color::White),
            Cell::new(truncate(&record.response, 40)).fg(Color::White),
        ]);
    }

    println!();
    println!("  {}", style(heading).bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} interaction{}",
        style(records.len()).bold(),
        if records.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn short_id(id: &Uuid) -> String {
    let full = id.to_string();
    format!("{}...", &full[..8])
}

/// Char-boundary-safe truncation; prompts may be Persian text.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_argument_means_recent() {
        assert_eq!(LogsTarget::from_arg(None).unwrap(), LogsTarget::Recent);
    }

    #[test]
    fn test_stats_argument() {
        assert_eq!(
            LogsTarget::from_arg(Some("stats")).unwrap(),
            LogsTarget::Stats
        );
    }

    #[test]
    fn test_other_argument_is_session_id() {
        let id = Uuid::now_v7();
        assert_eq!(
            LogsTarget::from_arg(Some(&id.to_string())).unwrap(),
            LogsTarget::Session(id)
        );
    }

    #[test]
    fn test_invalid_session_id_is_rejected() {
        let err = LogsTarget::from_arg(Some("not-a-uuid")).unwrap_err();
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn test_truncate_handles_multibyte_text() {
        let farsi = "احساس انزوا و تنهایی می‌کنم و نیاز به کمک دارم";
        let short = truncate(farsi, 10);
        assert!(short.chars().count() <= 10);
        assert!(short.ends_with("..."));
        // Must not panic on char boundaries, and short input passes through.
        assert_eq!(truncate("hi", 10), "hi");
    }
}
