use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::debug;

/// Failure of a single fetch. Messages carry these around, so every variant
/// stays cheap to clone.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    #[error("`{endpoint}` answered with status {status}")]
    ApiStatus {
        endpoint: String,
        status: StatusCode,
    },

    #[error("malformed payload from `{endpoint}`: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error(transparent)]
    Other(Arc<anyhow::Error>),
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[cold]
    pub fn malformed(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedPayload {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    #[cold]
    fn from(error: reqwest::Error) -> Self {
        debug!("`{error}`");
        if let Some(status) = error.status() {
            Self::ApiStatus {
                endpoint: error.url().map(ToString::to_string).unwrap_or_default(),
                status,
            }
        } else {
            Self::Network(Arc::new(error))
        }
    }
}

impl From<anyhow::Error> for Error {
    #[cold]
    fn from(error: anyhow::Error) -> Self {
        debug!("`{error}`");
        Self::Other(Arc::new(error))
    }
}

#[macro_export]
macro_rules! anyerr {
    ($($tt:tt)*) => {
        $crate::utils::Error::from(anyhow::anyhow!($($tt)*))
    };
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_preserved() {
        let error = Error::ApiStatus {
            endpoint: "stock/GetStock".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn ad_hoc_errors_are_other() {
        let error = anyerr!("broken `{}`", 42);
        assert!(matches!(error, Error::Other(_)));
        assert_eq!(error.status(), None);
        assert_eq!(error.to_string(), "broken `42`");
    }
}
