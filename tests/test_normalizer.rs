//! Response normalizer tests against an in-memory transport
//!
//! Every upstream outcome must come back as exactly one envelope variant with the
//! classified error kind and the upstream diagnostics preserved.


use serde_json::{Value, json};
use tokio::time::Duration;

use github_scope_query::github::error::TransportError;
use github_scope_query::github::graphql::graphql_types::{
    ComposedQuery, Connection, GraphQLError, GraphQLResponse,
};
use github_scope_query::github::graphql::rate_limit::rate_limit_query;
use github_scope_query::github::graphql::repository::RepositoryQueryConfig;
use github_scope_query::services::ScopedFetcher;
use github_scope_query::types::{
    Credential, Cursor, ErrorKind, RepositoryId, RepositoryScope, ResultEnvelope,
};
use test_util::{FakeTransport, TransportResult, request};

fn credential() -> Credential {
    Credential::token("ghp_test")
}

fn query() -> ComposedQuery {
    ComposedQuery::document("viewer {\nlogin\n}")
}

fn status_error(status: u16) -> TransportError {
    TransportError::Status {
        status,
        message: format!("status {}", status),
        documentation_url: None,
        errors: None,
    }
}

/// Exactly one of `data` or `error` is present in the serialized envelope.
fn assert_envelope_shape(envelope: &ResultEnvelope<Value>) {
    let json = serde_json::to_value(envelope).expect("serializable envelope");
    let has_data = json.get("data").is_some();
    let has_error = json.get("error").is_some();
    assert!(has_data != has_error, "malformed envelope: {}", json);
    assert_eq!(json["success"], json!(has_data));
}

#[tokio::test]
async fn test_success_returns_data() {
    let fetcher = ScopedFetcher::new(FakeTransport::with_data(json!({"viewer": {"login": "octo"}})));
    let envelope = fetcher
        .execute::<Value>("viewer", &query(), Some(&credential()))
        .await;

    assert!(envelope.is_success());
    assert_eq!(envelope.data().map(|d| d["viewer"]["login"].clone()), Some(json!("octo")));
    assert_envelope_shape(&envelope);
    assert_eq!(fetcher.transport().calls(), 1);
}

#[test]
fn test_missing_credential_short_circuits_on_first_poll() {
    let fetcher = ScopedFetcher::new(FakeTransport::with_data(json!({})));
    let query = query();

    let mut task = tokio_test::task::spawn(fetcher.execute::<Value>("viewer", &query, None));
    let envelope = tokio_test::assert_ready!(task.poll());
    drop(task);

    assert_eq!(envelope.error(), Some(ErrorKind::NoAuthProvided));
    assert_envelope_shape(&envelope);
    assert_eq!(fetcher.transport().calls(), 0);
}

#[tokio::test]
async fn test_not_found_keeps_diagnostics() {
    let error = GraphQLError::new("Could not resolve to a Repository with the name 'o/missing'.")
        .with_type("NOT_FOUND")
        .with_path(vec![json!("repository")]);
    let fetcher = ScopedFetcher::new(FakeTransport::with_errors(vec![error]));

    let envelope = fetcher
        .fetch_repository::<Value>(
            &RepositoryId::new("o".to_string(), "missing".to_string()),
            &RepositoryQueryConfig::new(vec![request(RepositoryScope::Info, 1)]),
            Some(&credential()),
        )
        .await;

    assert_eq!(envelope.error(), Some(ErrorKind::UpstreamNotFound));
    assert_eq!(envelope.error().map(|kind| kind.http_status()), Some(404));
    let json = serde_json::to_value(&envelope).expect("serializable envelope");
    assert_eq!(json["type"], json!("NOT_FOUND"));
    assert_eq!(json["path"], json!(["repository"]));
    assert!(json["cause"].is_string());
    assert_envelope_shape(&envelope);

    let sent = fetcher.transport().queries();
    assert!(sent[0].as_str().contains(r#"repository(owner: "o", name: "missing")"#));
}

#[tokio::test]
async fn test_transport_status_classification() {
    let cases = [
        (401, ErrorKind::UpstreamAuthInvalid),
        (403, ErrorKind::UpstreamAuthInvalid),
        (400, ErrorKind::UpstreamBadRequest),
        (502, ErrorKind::UpstreamInternal),
    ];
    for (status, expected) in cases {
        let fetcher = ScopedFetcher::new(FakeTransport::with_transport_error(status_error(status)));
        let envelope = fetcher
            .execute::<Value>("viewer", &query(), Some(&credential()))
            .await;
        assert_eq!(envelope.error(), Some(expected), "status {}", status);
        assert_envelope_shape(&envelope);
    }
}

#[tokio::test]
async fn test_unresolved_installation_is_an_auth_failure() {
    let fetcher = ScopedFetcher::new(FakeTransport::with_transport_error(
        TransportError::Credential("installation id 42".to_string()),
    ));
    let envelope = fetcher
        .execute::<Value>("viewer", &query(), Some(&Credential::installation(42)))
        .await;
    assert_eq!(envelope.error(), Some(ErrorKind::UpstreamAuthInvalid));
}

#[tokio::test]
async fn test_internal_failures_are_retried_when_enabled() {
    let transport = FakeTransport::new(vec![
        Err(TransportError::Network("connection reset".to_string())),
        Err(status_error(502)),
        Ok(GraphQLResponse {
            data: Some(json!({"viewer": {"login": "octo"}})),
            errors: None,
        }),
    ]);
    let fetcher = ScopedFetcher::new(transport)
        .with_max_retries(2)
        .with_retry_base_delay(Duration::from_millis(1));

    let envelope = fetcher
        .execute::<Value>("viewer", &query(), Some(&credential()))
        .await;
    assert!(envelope.is_success());
    assert_eq!(fetcher.transport().calls(), 3);
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let fetcher = ScopedFetcher::new(FakeTransport::new(vec![
        Err(status_error(500)),
        Err(status_error(500)),
    ]));
    let envelope = fetcher
        .execute::<Value>("viewer", &query(), Some(&credential()))
        .await;
    assert_eq!(envelope.error(), Some(ErrorKind::UpstreamInternal));
    assert_eq!(fetcher.transport().calls(), 1);
}

#[tokio::test]
async fn test_auth_failures_are_never_retried() {
    let fetcher = ScopedFetcher::new(FakeTransport::new(vec![
        Err(status_error(401)),
        Err(status_error(401)),
    ]))
    .with_max_retries(3)
    .with_retry_base_delay(Duration::from_millis(1));
    let envelope = fetcher
        .execute::<Value>("viewer", &query(), Some(&credential()))
        .await;
    assert_eq!(envelope.error(), Some(ErrorKind::UpstreamAuthInvalid));
    assert_eq!(fetcher.transport().calls(), 1);
}

#[tokio::test]
async fn test_rate_limit_is_typed() {
    let fetcher = ScopedFetcher::new(FakeTransport::with_data(json!({
        "rateLimit": {"limit": 5000, "remaining": 4990, "used": 10, "resetAt": "2024-05-01T10:00:00Z"}
    })));
    let envelope = fetcher.fetch_rate_limit(Some(&credential())).await;
    let rate_limit = envelope.into_result().expect("rate limit data");
    assert_eq!(rate_limit.remaining, 4990);
    assert!(!rate_limit.is_exhausted());
    assert_eq!(
        fetcher.transport().queries(),
        vec![rate_limit_query()]
    );
}

#[derive(Debug, serde::Deserialize)]
struct TopicsData {
    repository: TopicsRepository,
}

#[derive(Debug, serde::Deserialize)]
struct TopicsRepository {
    #[serde(rename = "repositoryTopics")]
    repository_topics: Connection<Value>,
}

#[tokio::test]
async fn test_end_cursor_continues_next_page() {
    let page = |cursor: Option<&str>, has_next: bool| -> TransportResult {
        Ok(GraphQLResponse {
            data: Some(json!({"repository": {"repositoryTopics": {
                "pageInfo": {"hasNextPage": has_next, "endCursor": cursor},
                "nodes": [{"url": "https://github.com/topics/rust", "topic": {"name": "rust"}}]
            }}})),
            errors: None,
        })
    };
    let fetcher = ScopedFetcher::new(FakeTransport::new(vec![
        page(Some("Y3Vyc29yOjE="), true),
        page(Some("Y3Vyc29yOjI="), false),
    ]));
    let repository = RepositoryId::new("rust-lang".to_string(), "cargo".to_string());

    let mut cursor = Cursor::none();
    let mut pages = 0;
    loop {
        let config = RepositoryQueryConfig::new(vec![
            request(RepositoryScope::Topics, 1).with_cursor(cursor.clone()),
        ]);
        let data = fetcher
            .fetch_repository::<TopicsData>(&repository, &config, Some(&credential()))
            .await
            .into_result()
            .expect("topics page");
        pages += 1;
        assert_eq!(data.repository.repository_topics.nodes.len(), 1);
        match data.repository.repository_topics.page_info.as_ref().and_then(|p| p.next_cursor()) {
            Some(next) => cursor = Cursor::from(next),
            None => break,
        }
    }

    assert_eq!(pages, 2);
    let sent = fetcher.transport().queries();
    assert!(sent[0].as_str().contains("repositoryTopics(first: 1, after: null)"));
    assert!(sent[1].as_str().contains(r#"repositoryTopics(first: 1, after: "Y3Vyc29yOjE=")"#));
}
