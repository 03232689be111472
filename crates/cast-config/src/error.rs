use thiserror::Error;

/// Failure to assemble a [`CastConfig`](crate::CastConfig) from its layers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `TGCAST_*` variable could not be parsed into the schema.
    #[error("failed to load tgcast config: {0}")]
    Figment(#[from] figment::Error),

    #[error("config key '{field}' {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    /// Dotted key of the offending value, when the error names one.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { field, .. } => Some(*field),
            Self::Figment(_) => None,
        }
    }
}
