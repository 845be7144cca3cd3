//! clap-based command-line interface for DRAFTHORSE.
//!
//! Defines the [`Cli`] struct with the [`Command`] subcommands
//! (generate, reports) and global flags.

use clap::{Parser, Subcommand};

/// DRAFTHORSE — concurrent multi-agent R&D proposal drafting engine.
#[derive(Debug, Parser)]
#[command(name = "drafthorse", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draft a proposal for the given project topic.
    Generate {
        /// The project idea to draft a proposal for.
        topic: String,

        /// Per-call timeout in seconds (overrides the config file).
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Overall deadline in seconds for the specialist fan-out.
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Directory to write the report into (overrides the config file).
        #[arg(long)]
        output_dir: Option<String>,

        /// Model to use (overrides the config file).
        #[arg(long)]
        model: Option<String>,
    },

    /// List saved reports, newest first.
    Reports,
}
