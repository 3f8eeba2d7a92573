pub mod pager;
pub mod rate_limit;

use serde::{Deserialize, Serialize};

pub use pager::*;
pub use rate_limit::*;

/// A complete GraphQL document produced by one of the composers.
///
/// Equal composer inputs produce byte-equal documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComposedQuery(pub String);

impl ComposedQuery {
    /// Wraps a root selection into a `query { .. }` document.
    pub fn document(root: &str) -> Self {
        Self(crate::github::graphql::selection("query", root))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ComposedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<T: serde::Serialize> {
    pub query: ComposedQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<T>,
}

impl GraphQLPayload<serde_json::Value> {
    pub fn new(query: ComposedQuery) -> Self {
        Self {
            query,
            variables: None,
        }
    }
}

/// Raw GraphQL response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// Upstream classification such as `NOT_FOUND`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            error_type: None,
            extensions: None,
        }
    }

    pub fn with_type<T: Into<String>>(mut self, error_type: T) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn with_path(mut self, path: Vec<serde_json::Value>) -> Self {
        self.path = path;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}
