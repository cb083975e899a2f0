use godo_store::TokenStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, config: &godo_config::GodoConfig) -> anyhow::Result<()> {
    TokenStore::new(config.google.token_path_buf()).delete()?;
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
