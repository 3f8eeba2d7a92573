//! Scope validation
//!
//! Turns raw caller input into validated scope requests before anything is composed.
//! Every failure here happens before a network call.

use serde_json::Value;

use crate::github::graphql::project::ProjectQueryConfig;
use crate::github::graphql::repository::RepositoryQueryConfig;
use crate::types::{
    AccountScope, Cursor, IssueState, MilestoneDepth, PageSize, ProjectScope, ProjectScopeBody,
    RawScopeRequest, RepositoryScope, ScopeError, ScopeInput, ScopeRequest, ScopeTag,
};

pub const DEFAULT_ACCOUNT_SCOPES: &[AccountScope] = &[AccountScope::Essential];
pub const DEFAULT_PROJECT_SCOPES: &[ProjectScope] = &[ProjectScope::Info];
pub const DEFAULT_REPOSITORY_SCOPES: &[RepositoryScope] = &[RepositoryScope::Info];
pub const DEFAULT_MILESTONE_DEPTH: &[MilestoneDepth] = &[MilestoneDepth::Info];

/// Validates a list of scope names against the catalog of `S`.
///
/// Absent or empty input resolves to `fallback`. Repeated names are kept once.
pub fn validate_scopes<S: ScopeTag>(
    input: Option<&ScopeInput>,
    fallback: &[S],
) -> Result<Vec<S>, ScopeError> {
    let entries = input.map(ScopeInput::entries).unwrap_or_default();
    if entries.is_empty() {
        return Ok(fallback.to_vec());
    }

    let mut scopes = Vec::with_capacity(entries.len());
    for entry in entries {
        let scope = S::parse_tag(entry)?;
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }
    Ok(scopes)
}

/// Accepts integers and integer strings within `1..=100`.
pub fn validate_page_size(value: &Value) -> Result<PageSize, ScopeError> {
    let invalid = || ScopeError::InvalidPageSize {
        value: match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    };
    let number = match value {
        Value::Number(number) => number.as_i64().ok_or_else(invalid)?,
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    PageSize::new(number).map_err(|_| invalid())
}

pub fn validate_cursor(raw: Option<&str>) -> Cursor {
    Cursor::parse(raw)
}

fn validate_request<S: ScopeTag>(
    raw: &RawScopeRequest,
    default_page_size: PageSize,
) -> Result<ScopeRequest<S>, ScopeError> {
    let scope_name = S::parse_tag(raw.scope_name.trim())?;
    let page_size = match &raw.page_size {
        None | Some(Value::Null) => default_page_size,
        Some(value) => validate_page_size(value)?,
    };
    Ok(ScopeRequest::new(scope_name, page_size)
        .with_cursor(validate_cursor(raw.continue_after.as_deref())))
}

/// Validates structured `{scopeName, pageSize?, continueAfter?}` records.
///
/// An empty list resolves to `fallback`, each with `default_page_size` and no cursor.
pub fn validate_scope_requests<S: ScopeTag>(
    raw: &[RawScopeRequest],
    fallback: &[S],
    default_page_size: PageSize,
) -> Result<Vec<ScopeRequest<S>>, ScopeError> {
    if raw.is_empty() {
        return Ok(fallback
            .iter()
            .map(|scope| ScopeRequest::new(*scope, default_page_size))
            .collect());
    }
    raw.iter()
        .map(|request| validate_request(request, default_page_size))
        .collect()
}

/// Parses the compact `tag[:pageSize[:cursor]],...` form, e.g. `license,topics:5:abc`.
///
/// Everything after the second colon belongs to the cursor.
pub fn parse_scope_list<S: ScopeTag>(
    text: &str,
    fallback: &[S],
    default_page_size: PageSize,
) -> Result<Vec<ScopeRequest<S>>, ScopeError> {
    let raw: Vec<RawScopeRequest> = text
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let mut request = RawScopeRequest::new(parts.next().unwrap_or_default());
            if let Some(page_size) = parts.next().filter(|p| !p.is_empty()) {
                request = request.with_page_size(Value::String(page_size.to_string()));
            }
            if let Some(cursor) = parts.next() {
                request = request.with_cursor(cursor);
            }
            request
        })
        .collect();
    validate_scope_requests(&raw, fallback, default_page_size)
}

/// Validates a structured project body into the project composer config.
pub fn validate_project_body(
    body: &ProjectScopeBody,
    default_issue_states: &[IssueState],
    default_page_size: PageSize,
) -> Result<ProjectQueryConfig, ScopeError> {
    let project_scopes =
        validate_scope_requests(&body.project_scopes, DEFAULT_PROJECT_SCOPES, default_page_size)?;
    let repository_scopes = validate_scope_requests(
        &body.repository_scopes,
        DEFAULT_REPOSITORY_SCOPES,
        default_page_size,
    )?;
    let issue_states = validate_scopes(body.issue_states.as_ref(), default_issue_states)?;
    Ok(ProjectQueryConfig::new(
        project_scopes,
        RepositoryQueryConfig::new(repository_scopes).with_issue_states(issue_states),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScopeLevel;
    use serde_json::json;

    #[test]
    fn test_validate_scopes_fallback_and_dedup() {
        let states = validate_scopes::<IssueState>(None, &[IssueState::Open, IssueState::Closed]);
        assert_eq!(states, Ok(vec![IssueState::Open, IssueState::Closed]));

        let empty = ScopeInput::from("");
        assert_eq!(
            validate_scopes(Some(&empty), DEFAULT_ACCOUNT_SCOPES),
            Ok(vec![AccountScope::Essential])
        );

        let input = ScopeInput::from("closed,open,closed");
        assert_eq!(
            validate_scopes::<IssueState>(Some(&input), &[]),
            Ok(vec![IssueState::Closed, IssueState::Open])
        );
    }

    #[test]
    fn test_validate_scopes_rejects_unknown() {
        let input = ScopeInput::List(vec!["info".to_string(), "wiki".to_string()]);
        let err = validate_scopes::<ProjectScope>(Some(&input), &[]).unwrap_err();
        assert!(matches!(
            err,
            ScopeError::InvalidScope { level: ScopeLevel::Project, ref value, .. } if value == "wiki"
        ));
    }

    #[test]
    fn test_page_size_bounds() {
        for bad in [json!(0), json!(101), json!("ten"), json!(1.5), json!(null), json!(true)] {
            assert!(
                matches!(
                    validate_page_size(&bad),
                    Err(ScopeError::InvalidPageSize { .. })
                ),
                "{} should be rejected",
                bad
            );
        }
        assert_eq!(validate_page_size(&json!(1)).map(|p| p.value()), Ok(1));
        assert_eq!(validate_page_size(&json!(100)).map(|p| p.value()), Ok(100));
        assert_eq!(validate_page_size(&json!("5")).map(|p| p.value()), Ok(5));
    }

    #[test]
    fn test_invalid_page_size_reports_raw_value() {
        assert_eq!(
            validate_page_size(&json!("ten")),
            Err(ScopeError::InvalidPageSize {
                value: "ten".to_string()
            })
        );
    }

    #[test]
    fn test_validate_scope_requests() {
        let raw = vec![
            RawScopeRequest::new("topics")
                .with_page_size(json!(5))
                .with_cursor("abc"),
            RawScopeRequest::new("license").with_cursor("undefined"),
        ];
        let requests =
            validate_scope_requests::<RepositoryScope>(&raw, &[], PageSize::DEFAULT).unwrap();
        assert_eq!(requests[0].window().arguments(), r#"first: 5, after: "abc""#);
        assert_eq!(requests[1].window().arguments(), "first: 1, after: null");

        let fallback =
            validate_scope_requests(&[], DEFAULT_REPOSITORY_SCOPES, PageSize::DEFAULT).unwrap();
        assert_eq!(fallback, vec![ScopeRequest::of(RepositoryScope::Info)]);
    }

    #[test]
    fn test_parse_scope_list() {
        let requests = parse_scope_list::<RepositoryScope>(
            "license, topics:5:abc:def , labels:",
            &[],
            PageSize::DEFAULT,
        )
        .unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].scope_name, RepositoryScope::License);
        assert_eq!(requests[1].page_size.value(), 5);
        assert_eq!(requests[1].continue_after.value(), Some("abc:def"));
        assert_eq!(requests[2].page_size, PageSize::DEFAULT);

        assert!(matches!(
            parse_scope_list::<RepositoryScope>("topics:0", &[], PageSize::DEFAULT),
            Err(ScopeError::InvalidPageSize { .. })
        ));
    }

    #[test]
    fn test_validate_project_body() {
        let body: ProjectScopeBody = serde_json::from_value(json!({
            "project_scopes": [{"scopeName": "repositories", "pageSize": 10}],
            "repository_scopes": [{"scopeName": "issues", "pageSize": 3}],
            "issue_states": "closed"
        }))
        .unwrap();
        let config = validate_project_body(&body, &[IssueState::Open], PageSize::DEFAULT).unwrap();
        assert_eq!(config.scopes[0].scope_name, ProjectScope::Repositories);
        assert_eq!(config.repositories.issue_states, vec![IssueState::Closed]);

        let invalid: ProjectScopeBody = serde_json::from_value(json!({
            "repository_scopes": [{"scopeName": "wiki"}]
        }))
        .unwrap();
        assert!(validate_project_body(&invalid, &[IssueState::Open], PageSize::DEFAULT).is_err());
    }
}
