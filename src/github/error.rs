/// Failure of a single transport call, tagged by what went wrong.
///
/// Produced by the transport adapter so the normalizer only ever matches on this enum,
/// never on the error types of the HTTP client underneath.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Upstream answered with a non-success HTTP status.
    #[error("upstream responded with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        documentation_url: Option<String>,
        errors: Option<Vec<serde_json::Value>>,
    },
    /// No response was received (connection, timeout, TLS).
    #[error("upstream request failed: {0}")]
    Network(String),
    /// The credential cannot be used by this transport.
    #[error("unusable credential: {0}")]
    Credential(String),
    /// A response was received but its body could not be read.
    #[error("invalid upstream response: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status reported by upstream, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Converts an octocrab error into its transport tag.
    pub fn from_octocrab_error(error: octocrab::Error) -> Self {
        tracing::debug!("Raw octocrab error: {:?}", error);

        let result = match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                tracing::warn!(
                    "GitHub API error - Status: {}, Message: {:?}, Documentation: {:?}",
                    status,
                    source.message,
                    source.documentation_url
                );
                Self::Status {
                    status,
                    message: source.message.clone(),
                    documentation_url: source.documentation_url.clone(),
                    errors: source.errors.clone(),
                }
            }
            octocrab::Error::Http { .. } | octocrab::Error::Hyper { .. } => {
                Self::Network(error.to_string())
            }
            octocrab::Error::Json { .. } | octocrab::Error::Serde { .. } => {
                Self::Decode(error.to_string())
            }
            _ => Self::Network(format!("Unknown error type: {}", error)),
        };

        tracing::debug!("Transport error classification result: {:?}", result);
        result
    }
}
