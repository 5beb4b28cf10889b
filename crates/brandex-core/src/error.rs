use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{option}`: {value} — {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error("failed to read brand roster at {path}: {source}")]
    RosterIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brand roster: {0}")]
    RosterParse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Validation(String),
}

impl ConfigError {
    /// Shorthand for the common invalid-option case.
    pub(crate) fn invalid(option: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
