//! `add`, `rename`, `notes`, `due`, `complete` and `delete`.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use godo_core::Task;
use godo_sync::TaskService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AddArgs, DueArgs, NotesArgs, RenameArgs, TaskIdArgs};
use crate::commands::sync::outcome_label;
use crate::context::AppContext;
use crate::output::output_task;

/// Handle `godo add`.
pub async fn add(args: &AddArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    let owner = match &args.parent {
        Some(parent) => parent.clone(),
        None => service
            .tree()
            .lists()
            .next()
            .map(|list| list.id.clone())
            .context("no task list to add to; create one in Google Tasks first")?,
    };
    let task = service.create(&owner, &args.title).await?;
    finish(ctx, &service, &task, flags).await
}

/// Handle `godo rename`.
pub async fn rename(
    args: &RenameArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    let task = service.rename(&args.id, &args.title).await?;
    finish(ctx, &service, &task, flags).await
}

/// Handle `godo notes`.
pub async fn notes(args: &NotesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    let task = service.set_notes(&args.id, args.notes.as_deref()).await?;
    finish(ctx, &service, &task, flags).await
}

/// Handle `godo due`.
pub async fn due(args: &DueArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let due = args.date.as_deref().map(parse_due).transpose()?;
    let mut service = ctx.service()?;
    let task = service.set_due(&args.id, due).await?;
    finish(ctx, &service, &task, flags).await
}

/// Handle `godo complete`.
pub async fn complete(
    args: &TaskIdArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    let task = service.toggle_complete(&args.id).await?;
    finish(ctx, &service, &task, flags).await
}

/// Handle `godo delete`.
pub async fn delete(
    args: &TaskIdArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    let removed = service.delete(&args.id).await?;
    finish(ctx, &service, &removed, flags).await
}

async fn finish(
    ctx: &AppContext,
    service: &TaskService,
    task: &Task,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = ctx.sync_after_edit(service).await;
    tracing::debug!(outcome = outcome_label(outcome), "post-edit sync");
    output_task(task, flags.format)
}

/// Accept a calendar date (midnight UTC) or a full RFC 3339 timestamp.
fn parse_due(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid due date '{raw}': expected YYYY-MM-DD or RFC 3339"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
