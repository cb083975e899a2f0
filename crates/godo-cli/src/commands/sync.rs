use godo_sync::ReconcileOutcome;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct SyncResponse {
    outcome: &'static str,
    task_count: usize,
    last_sync: Option<String>,
}

pub const fn outcome_label(outcome: ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Skipped => "skipped",
        ReconcileOutcome::Unchanged => "unchanged",
        ReconcileOutcome::Replaced => "replaced",
    }
}

/// Handle `godo sync`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !ctx.is_google() {
        tracing::info!("local-only mode; nothing to sync");
    }

    let (engine, _changes) = ctx.engine(ctx.load_forest()?);
    let outcome = engine.reconcile(&CancellationToken::new()).await;
    let snapshot = engine.cache().read();

    output(
        &SyncResponse {
            outcome: outcome_label(outcome),
            task_count: snapshot.task_count(),
            last_sync: snapshot.last_sync.map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
