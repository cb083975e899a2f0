use clap::{Args, Subcommand};

use crate::cli::subcommands::AuthCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Print the cached task tree.
    Show,
    /// Reconcile with the remote once.
    Sync,
    /// Keep syncing in the background and print every change until Ctrl-C.
    Watch,
    /// Create a task.
    Add(AddArgs),
    /// Change a task's title.
    Rename(RenameArgs),
    /// Set or clear a task's notes.
    Notes(NotesArgs),
    /// Set or clear a task's due date.
    Due(DueArgs),
    /// Toggle a task between open and completed.
    Complete(TaskIdArgs),
    /// Delete a task and its subtasks.
    Delete(TaskIdArgs),
    /// Google account authorization.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct AddArgs {
    /// Task title.
    pub title: String,
    /// List id or parent task id (defaults to the first list).
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RenameArgs {
    pub id: String,
    /// New title.
    pub title: String,
}

#[derive(Clone, Debug, Args)]
pub struct NotesArgs {
    pub id: String,
    /// New notes; omit to clear.
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DueArgs {
    pub id: String,
    /// `YYYY-MM-DD` or RFC 3339 timestamp; omit to clear.
    pub date: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TaskIdArgs {
    pub id: String,
}
