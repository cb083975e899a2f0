use anyhow::Context;
use godo_config::GodoConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (`.env`, TOML files, `GODO_*`) and apply the
/// `--google` / `--local` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<GodoConfig> {
    let mut config = GodoConfig::load_with_dotenv().context("failed to load godo configuration")?;
    if let Some(use_google) = flags.use_google {
        config.general.use_google = use_google;
    }
    tracing::debug!(
        use_google = config.general.use_google,
        data_dir = %config.storage.data_dir_path().display(),
        "configuration loaded"
    );
    Ok(config)
}
