mod login;
mod logout;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `godo auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &godo_config::GodoConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags, config),
    }
}
