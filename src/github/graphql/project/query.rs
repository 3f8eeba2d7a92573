use serde::{Deserialize, Serialize};

use crate::github::graphql::account::account_root;
use crate::github::graphql::fragments::{PROJECT_INFO, connection};
use crate::github::graphql::graphql_types::ComposedQuery;
use crate::github::graphql::repository::{RepositoryQueryConfig, linked_repositories_selection};
use crate::github::graphql::{ComposeOptions, ScopeSet, join_fragments, quote_string, selection};
use crate::types::{AccountTarget, PageWindow, ProjectScope, ScopeRequest, TargetIdentity};

/// Everything needed to compose the selection of a project node.
///
/// `repositories` only takes effect when the `repositories` project scope is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectQueryConfig {
    pub scopes: Vec<ScopeRequest<ProjectScope>>,
    #[serde(default)]
    pub repositories: RepositoryQueryConfig,
}

impl ProjectQueryConfig {
    pub fn new(scopes: Vec<ScopeRequest<ProjectScope>>, repositories: RepositoryQueryConfig) -> Self {
        Self {
            scopes,
            repositories,
        }
    }
}

/// How the project level is entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectAddress {
    /// A single project, fuzzy by name or exact by number.
    Single(TargetIdentity),
    /// The project list, one page at a time.
    List(PageWindow),
}

impl From<TargetIdentity> for ProjectAddress {
    fn from(identity: TargetIdentity) -> Self {
        Self::Single(identity)
    }
}

fn project_body(config: &ProjectQueryConfig, options: ComposeOptions) -> String {
    let scopes = ScopeSet::resolve(&config.scopes);

    let mut fragments = vec!["number".to_string(), "title".to_string()];
    for tag in scopes.tags() {
        match tag {
            ProjectScope::Info => fragments.push(PROJECT_INFO.to_string()),
            ProjectScope::Repositories => fragments.push(linked_repositories_selection(
                &scopes.window_or_nested(tag),
                &config.repositories,
                options,
            )),
        }
    }
    join_fragments(fragments)
}

/// Project selection relative to an account node.
pub fn project_selection(
    address: &ProjectAddress,
    config: &ProjectQueryConfig,
    options: ComposeOptions,
) -> String {
    let body = project_body(config, options);
    match address {
        ProjectAddress::Single(TargetIdentity::Name(name)) => selection(
            &format!("projectsV2(query: {}, first: 1)", quote_string(name)),
            &selection("nodes", &body),
        ),
        ProjectAddress::Single(TargetIdentity::Number(number)) => {
            selection(&format!("projectV2(number: {})", number), &body)
        }
        ProjectAddress::List(window) => connection(
            &format!("projectsV2({})", window.arguments()),
            options.include_total_count,
            &body,
        ),
    }
}

/// Document for a single project of `account`.
pub fn project_query(
    account: &AccountTarget,
    identity: &TargetIdentity,
    config: &ProjectQueryConfig,
    options: ComposeOptions,
) -> ComposedQuery {
    let project = project_selection(&ProjectAddress::Single(identity.clone()), config, options);
    ComposedQuery::document(&account_root(account, &project))
}
