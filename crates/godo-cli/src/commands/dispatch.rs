use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
///
/// `auth` never reaches here: it runs before the context is built, since
/// Google mode needs a token to build one.
pub async fn dispatch(
    command: &Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Show => commands::show::handle(ctx, flags),
        Commands::Sync => commands::sync::handle(ctx, flags).await,
        Commands::Watch => commands::watch::handle(ctx, flags).await,
        Commands::Add(args) => commands::edit::add(args, ctx, flags).await,
        Commands::Rename(args) => commands::edit::rename(args, ctx, flags).await,
        Commands::Notes(args) => commands::edit::notes(args, ctx, flags).await,
        Commands::Due(args) => commands::edit::due(args, ctx, flags).await,
        Commands::Complete(args) => commands::edit::complete(args, ctx, flags).await,
        Commands::Delete(args) => commands::edit::delete(args, ctx, flags).await,
        Commands::Auth { action } => {
            anyhow::bail!("`auth {action:?}` must run before the task context is loaded")
        }
    }
}
