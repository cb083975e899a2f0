//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Sync against Google Tasks. When false, godo runs on the local tasks
    /// file only and no remote client is constructed.
    #[serde(default)]
    pub use_google: bool,
}
