use anyhow::{Context, Result};
use octocrab::Octocrab;
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, info};

use super::error::TransportError;
use super::graphql::graphql_types::{GraphQLPayload, GraphQLResponse};
use crate::types::{AuthValue, Credential};

/// Executes one GraphQL document against upstream on behalf of a credential.
///
/// Every outcome is reported as a value: a parsed response body (which may itself carry
/// GraphQL errors) or a tagged [`TransportError`].
pub trait GraphQLTransport {
    #[allow(async_fn_in_trait)]
    async fn execute_graphql(
        &self,
        credential: &Credential,
        query_name: &str,
        payload: &GraphQLPayload<Value>,
    ) -> std::result::Result<GraphQLResponse<Value>, TransportError>;
}

/// Octocrab backed transport.
///
/// Credentials vary per call, so an octocrab client is built for each request from the
/// shared base URI and timeout.
#[derive(Debug, Clone, Default)]
pub struct GitHubClient {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GitHubClient {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        if let Some(url) = &base_url {
            Octocrab::builder()
                .base_uri(url.as_str())
                .with_context(|| format!("Invalid GitHub API base URL: {}", url))?;
        }
        Ok(Self { base_url, timeout })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn octocrab_for(&self, credential: &Credential) -> std::result::Result<Octocrab, TransportError> {
        let token = match &credential.auth {
            AuthValue::Token(token) => token.clone(),
            AuthValue::Installation(id) => {
                return Err(TransportError::Credential(format!(
                    "{} credential carries installation id {} instead of an installation token",
                    credential.auth_type, id
                )));
            }
        };

        let mut builder = Octocrab::builder().personal_token(token);

        if let Some(url) = &self.base_url {
            builder = builder
                .base_uri(url.as_str())
                .map_err(|e| TransportError::Network(e.to_string()))?;
        }

        if let Some(timeout) = self.timeout {
            let connection_timeout = std::cmp::max(timeout, Duration::from_secs(1));
            builder = builder
                .set_connect_timeout(Some(connection_timeout))
                .set_read_timeout(Some(connection_timeout))
                .set_write_timeout(Some(connection_timeout));
        }

        builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build GitHub client: {}", e)))
    }
}

impl GraphQLTransport for GitHubClient {
    async fn execute_graphql(
        &self,
        credential: &Credential,
        query_name: &str,
        payload: &GraphQLPayload<Value>,
    ) -> std::result::Result<GraphQLResponse<Value>, TransportError> {
        let client = self.octocrab_for(credential)?;

        debug!("Starting GraphQL request {}:\n{}", query_name, payload.query);
        let start_time = std::time::Instant::now();

        let response: GraphQLResponse<Value> = client
            .graphql(payload)
            .await
            .map_err(TransportError::from_octocrab_error)?;

        info!(
            "GraphQL request {} completed in {:?}",
            query_name,
            start_time.elapsed()
        );
        Ok(response)
    }
}
