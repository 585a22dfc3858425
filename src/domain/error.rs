//! Domain error types.

/// Top-level error type for the rebasing engine and its adapters.
#[derive(Debug, thiserror::Error)]
pub enum RebaseError {
    #[error("invalid timestamp {value:?}: expected a date, unix seconds or a date-time")]
    InvalidTimestamp { value: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RebaseError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        RebaseError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&RebaseError> for std::process::ExitCode {
    fn from(err: &RebaseError) -> Self {
        let code: u8 = match err {
            RebaseError::Io(_) | RebaseError::Report { .. } => 1,
            RebaseError::ConfigParse { .. }
            | RebaseError::ConfigMissing { .. }
            | RebaseError::ConfigInvalid { .. } => 2,
            RebaseError::Data { .. } => 3,
            RebaseError::InvalidTimestamp { .. } => 4,
            RebaseError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
