use thiserror::Error;

/// Unified error type for metric resolution.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Errors raised by chain adapters while talking to an upstream endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: String, detail: String },
}

impl FetchError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn invalid(endpoint: &str, detail: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.to_string(),
            detail: detail.into(),
        }
    }

    /// Whether the upstream was unreachable or refused the request, as
    /// opposed to answering with a body of the wrong shape.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    /// The endpoint that produced this error.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let status = FetchError::Status {
            endpoint: "https://rpc.example".to_string(),
            status: 502,
        };
        assert!(status.is_transport());
        assert_eq!(status.endpoint(), "https://rpc.example");

        let invalid = FetchError::invalid("https://rpc.example", "missing field `result`");
        assert!(!invalid.is_transport());
        assert_eq!(
            invalid.to_string(),
            "unexpected response from https://rpc.example: missing field `result`"
        );
    }
}
