use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output_forest;

/// Handle `godo show`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = ctx.service()?;
    output_forest(&service.forest(), flags.format)
}
