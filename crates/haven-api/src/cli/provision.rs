//! Table provisioning command.
//!
//! Declares the log table and blocks until the store reports it active.
//! There is deliberately no pre-existence check: re-running surfaces the
//! service's `ResourceInUseException` and terminates the command.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use haven_core::audit::InteractionStore;
use haven_types::record::TableStatus;

use crate::state::AppState;

pub async fn provision(state: &AppState, json: bool) -> Result<()> {
    state.store.create_log_table().await?;

    let spinner = if json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("  {spinner} {msg}").unwrap());
        spinner.set_message(format!(
            "Waiting for table '{}' to become active...",
            state.store.table_name()
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    loop {
        match state.store.table_status().await? {
            TableStatus::Active => break,
            _ => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "table": state.store.table_name(),
                "status": "ACTIVE",
            })
        );
    } else {
        println!();
        println!(
            "  {} Table '{}' created and active.",
            style("✓").green().bold(),
            style(state.store.table_name()).cyan()
        );
        println!();
    }

    Ok(())
}
