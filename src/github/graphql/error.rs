use serde_json::Value;

use crate::github::error::TransportError;
use crate::github::graphql::graphql_types::GraphQLError;
use crate::types::{ErrorKind, Failure};

/// Status the transport reports for a response that reached the GraphQL layer.
pub const GRAPHQL_OK_STATUS: u16 = 200;

/// Maps an upstream HTTP status onto the error taxonomy.
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::UpstreamAuthInvalid,
        400 => ErrorKind::UpstreamBadRequest,
        _ => ErrorKind::UpstreamInternal,
    }
}

/// Classifies the `errors` array of a GraphQL response.
///
/// Any error typed `NOT_FOUND` makes the whole call not-found; otherwise the transport
/// status decides. The first error provides the diagnostic payload.
pub fn classify_graphql_errors(errors: &[GraphQLError], status: u16) -> Failure {
    let not_found = errors.iter().find(|error| error.is_not_found());
    let (kind, primary) = match not_found {
        Some(error) => (ErrorKind::UpstreamNotFound, Some(error)),
        None => (kind_for_status(status), errors.first()),
    };

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match kind {
        ErrorKind::UpstreamNotFound => tracing::info!("GraphQL resource not found: {}", message),
        _ => tracing::error!("GraphQL error ({}): {}", kind, message),
    }

    let failure = Failure::new(kind, message);
    match primary {
        Some(error) => failure
            .with_cause(Some(cause_of(error)))
            .with_path(Some(error.path.clone()).filter(|path| !path.is_empty()))
            .with_type(error.error_type.clone()),
        None => failure,
    }
}

/// Classifies a failed transport call.
pub fn classify_transport_error(error: &TransportError) -> Failure {
    match error {
        TransportError::Status {
            status,
            message,
            errors,
            ..
        } => {
            let kind = kind_for_status(*status);
            tracing::error!("Upstream status {} classified as {}: {}", status, kind, message);
            Failure::new(kind, message.clone())
                .with_cause(errors.clone().map(Value::Array))
        }
        TransportError::Credential(message) => {
            tracing::warn!("Credential rejected by transport: {}", message);
            Failure::new(ErrorKind::UpstreamAuthInvalid, message.clone())
        }
        TransportError::Network(message) | TransportError::Decode(message) => {
            tracing::error!("Upstream call failed: {}", message);
            Failure::new(ErrorKind::UpstreamInternal, message.clone())
        }
    }
}

/// Extensions when upstream sent them, the message otherwise.
fn cause_of(error: &GraphQLError) -> Value {
    error
        .extensions
        .clone()
        .unwrap_or_else(|| Value::String(error.message.clone()))
}
