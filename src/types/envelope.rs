//! Uniform success/error envelope returned for every call
//!
//! Serializes as `{"success": true, "data": ...}` or
//! `{"success": false, "error": "<ErrorKind>", "message": ..., "cause"?, "path"?, "type"?}`.
//! The enum representation makes "both" and "neither" unrepresentable.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::scope::ScopeError;

/// Closed error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
pub enum ErrorKind {
    InvalidScope,
    InvalidPageSize,
    NoAuthProvided,
    UpstreamNotFound,
    UpstreamAuthInvalid,
    UpstreamBadRequest,
    UpstreamInternal,
}

impl ErrorKind {
    /// HTTP status a router should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::InvalidScope | Self::InvalidPageSize | Self::UpstreamBadRequest => 400,
            Self::NoAuthProvided | Self::UpstreamAuthInvalid => 401,
            Self::UpstreamNotFound => 404,
            Self::UpstreamInternal => 500,
        }
    }

    /// Validation kinds are detected before any network call.
    pub fn is_validation(self) -> bool {
        matches!(self, Self::InvalidScope | Self::InvalidPageSize)
    }
}

/// Failure half of the envelope, carrying the upstream diagnostics when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}: {message}")]
pub struct Failure {
    pub error: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl Failure {
    pub fn new<T: Into<String>>(error: ErrorKind, message: T) -> Self {
        Self {
            error,
            message: message.into(),
            cause: None,
            path: None,
            error_type: None,
        }
    }

    pub fn with_cause(mut self, cause: Option<serde_json::Value>) -> Self {
        self.cause = cause;
        self
    }

    pub fn with_path(mut self, path: Option<Vec<serde_json::Value>>) -> Self {
        self.path = path;
        self
    }

    pub fn with_type(mut self, error_type: Option<String>) -> Self {
        self.error_type = error_type;
        self
    }
}

impl From<ScopeError> for Failure {
    fn from(error: ScopeError) -> Self {
        let kind = match error {
            ScopeError::InvalidScope { .. } => ErrorKind::InvalidScope,
            ScopeError::InvalidPageSize { .. } => ErrorKind::InvalidPageSize,
        };
        Failure::new(kind, error.to_string())
    }
}

/// Result of one call: data on success, a classified failure otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope<T> {
    Success(T),
    Failure(Failure),
}

impl<T> ResultEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success(data)
    }

    pub fn failure<M: Into<String>>(error: ErrorKind, message: M) -> Self {
        Self::Failure(Failure::new(error, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.error),
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(failure) => Err(failure),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ResultEnvelope<U> {
        match self {
            Self::Success(data) => ResultEnvelope::Success(f(data)),
            Self::Failure(failure) => ResultEnvelope::Failure(failure),
        }
    }
}

impl<T> From<Result<T, Failure>> for ResultEnvelope<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(failure) => Self::Failure(failure),
        }
    }
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SuccessRepr<'a, T> {
            success: bool,
            data: &'a T,
        }

        #[derive(Serialize)]
        struct FailureRepr<'a> {
            success: bool,
            #[serde(flatten)]
            failure: &'a Failure,
        }

        match self {
            Self::Success(data) => SuccessRepr {
                success: true,
                data,
            }
            .serialize(serializer),
            Self::Failure(failure) => FailureRepr {
                success: false,
                failure,
            }
            .serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let envelope = ResultEnvelope::success(json!({"login": "octo"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": {"login": "octo"}})
        );
    }

    #[test]
    fn test_failure_serialization_keeps_diagnostics() {
        let envelope: ResultEnvelope<()> = ResultEnvelope::Failure(
            Failure::new(ErrorKind::UpstreamNotFound, "Could not resolve to a ProjectV2")
                .with_path(Some(vec![json!("organization"), json!("projectV2")]))
                .with_type(Some("NOT_FOUND".to_string())),
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("UpstreamNotFound"));
        assert_eq!(value["type"], json!("NOT_FOUND"));
        assert_eq!(value["path"], json!(["organization", "projectV2"]));
        assert!(value.get("data").is_none());
        assert!(value.get("cause").is_none());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorKind::UpstreamNotFound.http_status(), 404);
        assert_eq!(ErrorKind::UpstreamAuthInvalid.http_status(), 401);
        assert_eq!(ErrorKind::NoAuthProvided.http_status(), 401);
        assert_eq!(ErrorKind::InvalidScope.http_status(), 400);
        assert_eq!(ErrorKind::InvalidPageSize.http_status(), 400);
        assert_eq!(ErrorKind::UpstreamBadRequest.http_status(), 400);
        assert_eq!(ErrorKind::UpstreamInternal.http_status(), 500);
    }

    #[test]
    fn test_scope_error_maps_to_validation_kind() {
        let failure = Failure::from(ScopeError::InvalidPageSize {
            value: "ten".to_string(),
        });
        assert_eq!(failure.error, ErrorKind::InvalidPageSize);
        assert!(failure.error.is_validation());
    }
}
