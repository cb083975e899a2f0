use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `godo` binary.
#[derive(Debug, Parser)]
#[command(name = "godo", version, about = "godo - task lists, synced")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, tree
    #[arg(short, long, global = true, default_value = "tree")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sync with Google Tasks
    #[arg(long, global = true, conflicts_with = "local")]
    pub google: bool,

    /// Keep tasks in the local file only
    #[arg(long, global = true)]
    pub local: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        let use_google = if self.google {
            Some(true)
        } else if self.local {
            Some(false)
        } else {
            None
        };
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            use_google,
        }
    }
}
