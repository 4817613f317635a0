//! CLI command definitions for the `haven` binary.

pub mod logs;
pub mod provision;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Persona-based support chat over Bedrock with DynamoDB audit logging.
#[derive(Parser)]
#[command(name = "haven", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat front-end server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Create the interaction-log table (one-shot; fails if it exists).
    Provision,

    /// Inspect stored interaction logs.
    ///
    /// With no argument, shows recent records; `stats` prints aggregate
    /// counts; any other argument is treated as a session id filter.
    Logs {
        /// `stats` or a session id.
        target: Option<String>,

        /// Maximum records to fetch (scan page / per-session query).
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
