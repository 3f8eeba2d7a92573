use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::config::ComposerConfig;
use crate::github::GitHubClient;
use crate::github::client::GraphQLTransport;
use crate::github::graphql::account::{AccountQueryConfig, account_query};
use crate::github::graphql::error::{
    GRAPHQL_OK_STATUS, classify_graphql_errors, classify_transport_error,
};
use crate::github::graphql::graphql_types::{
    ComposedQuery, GraphQLPayload, GraphQLResponse, RateLimit, RateLimitData,
};
use crate::github::graphql::project::{ProjectQueryConfig, project_query};
use crate::github::graphql::rate_limit::rate_limit_query;
use crate::github::graphql::repository::{RepositoryQueryConfig, repository_query};
use crate::github::graphql::ComposeOptions;
use crate::types::{
    AccountTarget, Credential, ErrorKind, Failure, RepositoryId, ResultEnvelope, TargetIdentity,
};

/// Delay before the first retry; doubles on every further attempt.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Executes composed documents and normalizes every outcome into a [`ResultEnvelope`].
pub struct ScopedFetcher<T = GitHubClient> {
    transport: T,
    options: ComposeOptions,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ScopedFetcher<GitHubClient> {
    /// Fetcher over the octocrab transport, configured from `config`.
    pub fn from_config(config: &ComposerConfig) -> Result<Self> {
        let client = GitHubClient::new(config.api_base_url.clone(), config.request_timeout())?;
        Ok(Self::new(client)
            .with_options(config.compose_options())
            .with_max_retries(config.max_retries))
    }
}

impl<T: GraphQLTransport> ScopedFetcher<T> {
    /// Single attempt per call, default compose options.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            options: ComposeOptions::default(),
            max_retries: 0,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn options(&self) -> ComposeOptions {
        self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes `query` on behalf of `credential`.
    ///
    /// Without a credential the transport is never called and the envelope carries
    /// `NoAuthProvided`.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &ComposedQuery,
        credential: Option<&Credential>,
    ) -> ResultEnvelope<R> {
        let Some(credential) = credential else {
            warn!("No credential for {}, skipping upstream call", query_name);
            return ResultEnvelope::failure(
                ErrorKind::NoAuthProvided,
                "no credential was provided for the upstream call",
            );
        };

        debug!("Composed query {}:\n{}", query_name, query);
        let payload = GraphQLPayload::new(query.clone());
        let start_time = std::time::Instant::now();

        let result = retry_with_backoff(query_name, self.max_retries, self.retry_base_delay, || {
            self.execute_once(query_name, credential, &payload)
        })
        .await;

        info!(
            "{} finished in {:?} (success: {})",
            query_name,
            start_time.elapsed(),
            result.is_ok()
        );
        result.into()
    }

    async fn execute_once<R: DeserializeOwned>(
        &self,
        query_name: &str,
        credential: &Credential,
        payload: &GraphQLPayload<Value>,
    ) -> std::result::Result<R, Failure> {
        let response = self
            .transport
            .execute_graphql(credential, query_name, payload)
            .await
            .map_err(|e| classify_transport_error(&e))?;
        normalize_response(response)
    }

    pub async fn fetch_account<R: DeserializeOwned>(
        &self,
        account: &AccountTarget,
        config: &AccountQueryConfig,
        credential: Option<&Credential>,
    ) -> ResultEnvelope<R> {
        let query = account_query(account, config, self.options);
        self.execute("account", &query, credential).await
    }

    pub async fn fetch_project<R: DeserializeOwned>(
        &self,
        account: &AccountTarget,
        identity: &TargetIdentity,
        config: &ProjectQueryConfig,
        credential: Option<&Credential>,
    ) -> ResultEnvelope<R> {
        let query = project_query(account, identity, config, self.options);
        self.execute("project", &query, credential).await
    }

    pub async fn fetch_repository<R: DeserializeOwned>(
        &self,
        repository: &RepositoryId,
        config: &RepositoryQueryConfig,
        credential: Option<&Credential>,
    ) -> ResultEnvelope<R> {
        let query = repository_query(repository, config, self.options);
        self.execute("repository", &query, credential).await
    }

    /// Remaining request quota of `credential`.
    pub async fn fetch_rate_limit(&self, credential: Option<&Credential>) -> ResultEnvelope<RateLimit> {
        self.execute::<RateLimitData>("rate_limit", &rate_limit_query(), credential)
            .await
            .map(|data| data.rate_limit)
    }
}

/// Turns a received GraphQL body into data or a classified failure.
pub fn normalize_response<R: DeserializeOwned>(
    response: GraphQLResponse<Value>,
) -> std::result::Result<R, Failure> {
    if let Some(errors) = response.errors.as_deref().filter(|errors| !errors.is_empty()) {
        return Err(classify_graphql_errors(errors, GRAPHQL_OK_STATUS));
    }

    match response.data {
        None | Some(Value::Null) => Err(Failure::new(
            ErrorKind::UpstreamInternal,
            "upstream response carried neither data nor errors",
        )),
        Some(data) => serde_json::from_value(data).map_err(|e| {
            Failure::new(
                ErrorKind::UpstreamInternal,
                format!("failed to decode upstream data: {}", e),
            )
        }),
    }
}

/// Retries `execute_operation` while it fails with `UpstreamInternal`.
async fn retry_with_backoff<F, Fut, R>(
    operation_name: &str,
    max_retries: u32,
    base_delay: Duration,
    execute_operation: F,
) -> std::result::Result<R, Failure>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<R, Failure>>,
{
    let mut attempt = 0;

    loop {
        match execute_operation().await {
            Ok(result) => {
                debug!(
                    "Operation {} succeeded on attempt {}",
                    operation_name,
                    attempt + 1
                );
                return Ok(result);
            }
            Err(failure) if failure.error == ErrorKind::UpstreamInternal && attempt < max_retries => {
                attempt += 1;
                let backoff_delay = base_delay.saturating_mul(2_u32.saturating_pow(attempt - 1));
                warn!(
                    "Retryable failure for {}, attempt {}/{}, backing off for {:?}: {}",
                    operation_name, attempt, max_retries, backoff_delay, failure
                );
                sleep(backoff_delay).await;
            }
            Err(failure) => {
                warn!(
                    "Operation {} failed on attempt {}: {}",
                    operation_name,
                    attempt + 1,
                    failure
                );
                return Err(failure);
            }
        }
    }
}
