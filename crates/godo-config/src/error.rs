use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// Google mode is selected but an OAuth client credential is empty.
    #[error("Google mode needs google.{field} (set it in config.toml or GODO_GOOGLE__{env})")]
    MissingCredential {
        field: &'static str,
        env: &'static str,
    },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
