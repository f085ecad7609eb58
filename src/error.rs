use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid root margin `{value}`: {reason}")]
    RootMargin { value: String, reason: &'static str },
}

impl ConfigError {
    pub(crate) fn root_margin(value: &str, reason: &'static str) -> Self {
        Self::RootMargin {
            value: value.to_string(),
            reason,
        }
    }
}

/// Failures reported by browser APIs. Callers log these and carry on without
/// the affected behaviour.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("browser window is unavailable")]
    NoWindow,
    #[error("document is unavailable")]
    NoDocument,
    #[error("{context} failed: {message}")]
    Js {
        context: &'static str,
        message: String,
    },
}
