use godo_sync::SyncHandle;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{output, output_forest};

#[derive(Serialize)]
struct ChangeResponse {
    task_count: usize,
    last_sync: String,
}

/// Handle `godo watch`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !ctx.is_google() {
        anyhow::bail!("watch: nothing to sync in local-only mode (use --google)");
    }

    let (engine, mut changes) = ctx.engine(ctx.load_forest()?);
    let interval = ctx.config.sync.interval();
    let handle = SyncHandle::spawn(engine.clone(), interval);
    tracing::info!(interval_secs = interval.as_secs(), "watching for changes");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    tracing::warn!(%error, "failed to listen for Ctrl-C");
                }
                break;
            }
            change = changes.recv() => {
                let Some(change) = change else { break };
                if flags.quiet {
                    continue;
                }
                output(
                    &ChangeResponse {
                        task_count: change.task_count,
                        last_sync: change.last_sync.to_rfc3339(),
                    },
                    flags.format,
                )?;
                if !matches!(flags.format, crate::cli::OutputFormat::Json) {
                    output_forest(&engine.cache().read().tasks, flags.format)?;
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
