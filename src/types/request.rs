//! Request side types: page sizes, cursors, scope requests and target identities
//!
//! These are created per inbound call from query or body parameters and discarded once
//! the composed document has been built.

use serde::{Deserialize, Serialize};

use super::scope::{ScopeError, ScopeTag};
use crate::github::graphql::quote_string;

/// Number of nodes fetched for a paginated collection, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PageSize(u8);

impl PageSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Page size used when a request omits it.
    pub const DEFAULT: PageSize = PageSize(1);

    /// Page size of nested collections that have no request of their own.
    pub const NESTED: PageSize = PageSize(10);

    pub fn new(value: i64) -> Result<Self, ScopeError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScopeError::InvalidPageSize {
                value: value.to_string(),
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for PageSize {
    type Error = ScopeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u8 {
    fn from(page_size: PageSize) -> Self {
        page_size.0
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque pagination cursor (`continueAfter`).
///
/// Absent values and the placeholder strings `""`, `"null"` and `"undefined"` all mean
/// "no cursor" and render as a bare `null` argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub struct Cursor(Option<String>);

impl Cursor {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("null") | Some("undefined") => Self(None),
            Some(value) => Self(Some(value.to_string())),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<String>> for Cursor {
    fn from(raw: Option<String>) -> Self {
        Self::parse(raw.as_deref())
    }
}

impl From<Cursor> for Option<String> {
    fn from(cursor: Cursor) -> Self {
        cursor.0
    }
}

impl From<&str> for Cursor {
    fn from(raw: &str) -> Self {
        Self::parse(Some(raw))
    }
}

/// Renders the cursor as a GraphQL argument value.
impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{}", quote_string(value)),
            None => write!(f, "null"),
        }
    }
}

/// Pagination window of one collection: `first: <page_size>, after: <cursor>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub continue_after: Cursor,
}

impl PageWindow {
    pub fn new(page_size: PageSize, continue_after: Cursor) -> Self {
        Self {
            page_size,
            continue_after,
        }
    }

    pub fn first(page_size: PageSize) -> Self {
        Self::new(page_size, Cursor::none())
    }

    /// Window of nested collections nobody asked a page size for.
    pub fn nested() -> Self {
        Self::first(PageSize::NESTED)
    }

    pub fn arguments(&self) -> String {
        format!("first: {}, after: {}", self.page_size, self.continue_after)
    }
}

/// One requested sub-resource together with its pagination window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequest<S> {
    pub scope_name: S,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub continue_after: Cursor,
}

impl<S: ScopeTag> ScopeRequest<S> {
    pub fn new(scope_name: S, page_size: PageSize) -> Self {
        Self {
            scope_name,
            page_size,
            continue_after: Cursor::none(),
        }
    }

    /// Request with the default page size and no cursor.
    pub fn of(scope_name: S) -> Self {
        Self::new(scope_name, PageSize::DEFAULT)
    }

    pub fn with_cursor(mut self, continue_after: Cursor) -> Self {
        self.continue_after = continue_after;
        self
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page_size, self.continue_after.clone())
    }
}

/// Scope request exactly as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScopeRequest {
    #[serde(alias = "scope_name")]
    pub scope_name: String,
    #[serde(default, alias = "page_size")]
    pub page_size: Option<serde_json::Value>,
    #[serde(default, alias = "continue_after")]
    pub continue_after: Option<String>,
}

impl RawScopeRequest {
    pub fn new<T: Into<String>>(scope_name: T) -> Self {
        Self {
            scope_name: scope_name.into(),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: serde_json::Value) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_cursor<T: Into<String>>(mut self, cursor: T) -> Self {
        self.continue_after = Some(cursor.into());
        self
    }
}

/// Scope list as received: a comma separated string or an array of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeInput {
    Text(String),
    List(Vec<String>),
}

impl ScopeInput {
    /// Non-empty, trimmed entries in input order.
    pub fn entries(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            Self::Text(text) => text.split(',').collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl From<&str> for ScopeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for ScopeInput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Structured project request body: project scopes plus the nested repository scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectScopeBody {
    #[serde(default, alias = "projectScopes")]
    pub project_scopes: Vec<RawScopeRequest>,
    #[serde(default, alias = "repositoryScopes")]
    pub repository_scopes: Vec<RawScopeRequest>,
    #[serde(default, alias = "issueStates")]
    pub issue_states: Option<ScopeInput>,
}

/// How a single resource is addressed: fuzzy by name or exactly by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TargetIdentity {
    Name(String),
    Number(u64),
}

impl TargetIdentity {
    /// Identifiers that parse as an integer address by number, anything else by name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

impl From<u64> for TargetIdentity {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for TargetIdentity {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl std::fmt::Display for TargetIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Number(number) => write!(f, "#{}", number),
        }
    }
}

/// Wrapper type for milestone numbers providing type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MilestoneNumber(pub u64);

impl MilestoneNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MilestoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selects a single milestone by number or the paginated milestone list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalNumber {
    Singular(MilestoneNumber),
    #[default]
    Plural,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepositoryScope;

    #[test]
    fn test_page_size_bounds() {
        assert!(PageSize::new(0).is_err());
        assert!(PageSize::new(101).is_err());
        assert!(PageSize::new(-3).is_err());
        assert_eq!(PageSize::new(1).map(|p| p.value()), Ok(1));
        assert_eq!(PageSize::new(100).map(|p| p.value()), Ok(100));
    }

    #[test]
    fn test_cursor_placeholders_render_as_null() {
        for raw in [None, Some(""), Some("null"), Some("undefined")] {
            let cursor = Cursor::parse(raw);
            assert!(cursor.is_none(), "{:?} should mean no cursor", raw);
            assert_eq!(cursor.to_string(), "null");
        }
        assert_eq!(Cursor::from("abc123").to_string(), r#""abc123""#);
    }

    #[test]
    fn test_window_arguments() {
        let window = PageWindow::new(PageSize::new(5).unwrap(), Cursor::from("abc"));
        assert_eq!(window.arguments(), r#"first: 5, after: "abc""#);
        assert_eq!(PageWindow::nested().arguments(), "first: 10, after: null");
    }

    #[test]
    fn test_scope_request_deserializes_camel_case() {
        let request: ScopeRequest<RepositoryScope> = serde_json::from_str(
            r#"{"scopeName": "topics", "pageSize": 5, "continueAfter": "undefined"}"#,
        )
        .unwrap();
        assert_eq!(request.scope_name, RepositoryScope::Topics);
        assert_eq!(request.page_size.value(), 5);
        assert!(request.continue_after.is_none());

        let defaulted: ScopeRequest<RepositoryScope> =
            serde_json::from_str(r#"{"scopeName": "license"}"#).unwrap();
        assert_eq!(defaulted.page_size, PageSize::DEFAULT);
    }

    #[test]
    fn test_scope_request_rejects_page_size_out_of_bounds() {
        let result: Result<ScopeRequest<RepositoryScope>, _> =
            serde_json::from_str(r#"{"scopeName": "topics", "pageSize": 101}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_input_entries() {
        assert_eq!(
            ScopeInput::from(" license, ,topics ").entries(),
            vec!["license", "topics"]
        );
        let list: ScopeInput = serde_json::from_str(r#"["open", "closed"]"#).unwrap();
        assert_eq!(list.entries(), vec!["open", "closed"]);
    }

    #[test]
    fn test_project_body_accepts_both_casings() {
        let body: ProjectScopeBody = serde_json::from_str(
            r#"{"projectScopes": [{"scopeName": "repositories", "pageSize": 5}],
                "repository_scopes": [{"scope_name": "count"}]}"#,
        )
        .unwrap();
        assert_eq!(body.project_scopes[0].scope_name, "repositories");
        assert_eq!(body.repository_scopes[0].scope_name, "count");
        assert!(body.issue_states.is_none());
    }

    #[test]
    fn test_target_identity_parse() {
        assert_eq!(TargetIdentity::parse("12"), TargetIdentity::Number(12));
        assert_eq!(
            TargetIdentity::parse("roadmap"),
            TargetIdentity::Name("roadmap".to_string())
        );
        assert_eq!(
            TargetIdentity::parse("  Q3 Roadmap "),
            TargetIdentity::Name("Q3 Roadmap".to_string())
        );
        assert_eq!(TargetIdentity::parse(" 7 "), TargetIdentity::Number(7));
        let json = serde_json::to_value(TargetIdentity::Number(3)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "number", "value": 3}));
    }
}
