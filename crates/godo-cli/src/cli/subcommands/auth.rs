use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Authorize godo against a Google account.
    Login(AuthLoginArgs),
    /// Remove the stored token.
    Logout,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Authorization code, if already obtained. Read from stdin otherwise.
    #[arg(long)]
    pub code: Option<String>,
}
