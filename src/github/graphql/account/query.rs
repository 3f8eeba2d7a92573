use serde::{Deserialize, Serialize};

use crate::github::graphql::fragments::{
    ORGANIZATION_ESSENTIAL, ORGANIZATION_INFO, USER_ESSENTIAL, USER_INFO, packages,
};
use crate::github::graphql::graphql_types::ComposedQuery;
use crate::github::graphql::project::{ProjectAddress, ProjectQueryConfig, project_selection};
use crate::github::graphql::{ComposeOptions, ScopeSet, join_fragments, quote_string, selection};
use crate::types::{AccountScope, AccountTarget, AccountType, PageWindow, ScopeRequest};

/// Everything needed to compose an account document.
///
/// `projects` describes each project node and only takes effect with the `projects` scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountQueryConfig {
    pub scopes: Vec<ScopeRequest<AccountScope>>,
    #[serde(default)]
    pub projects: ProjectQueryConfig,
}

impl AccountQueryConfig {
    pub fn new(scopes: Vec<ScopeRequest<AccountScope>>) -> Self {
        Self {
            scopes,
            ..Self::default()
        }
    }

    pub fn with_projects(mut self, projects: ProjectQueryConfig) -> Self {
        self.projects = projects;
        self
    }
}

/// `organization(login: ..) { login .. }` or the `user` equivalent.
pub fn account_root(account: &AccountTarget, body: &str) -> String {
    let head = format!(
        "{}(login: {})",
        account.account_type,
        quote_string(account.login.as_str())
    );
    selection(&head, &join_fragments(["login".to_string(), body.to_string()]))
}

/// Account level fields, without the root.
pub fn account_selection(
    account: &AccountTarget,
    config: &AccountQueryConfig,
    options: ComposeOptions,
) -> String {
    let mut scopes = ScopeSet::resolve(&config.scopes);
    if options.implicit_essential && !scopes.is_empty() {
        scopes = scopes.with_implicit(AccountScope::Essential, PageWindow::default());
    }

    let mut fragments = Vec::new();
    for tag in scopes.tags() {
        let window = scopes.window_or_nested(tag);
        match (tag, account.account_type) {
            (AccountScope::Essential, AccountType::Organization) => {
                fragments.push(ORGANIZATION_ESSENTIAL.to_string())
            }
            (AccountScope::Essential, AccountType::User) => {
                fragments.push(USER_ESSENTIAL.to_string())
            }
            (AccountScope::Info, AccountType::Organization) => {
                fragments.push(ORGANIZATION_INFO.to_string())
            }
            (AccountScope::Info, AccountType::User) => fragments.push(USER_INFO.to_string()),
            (AccountScope::Packages, _) => fragments.push(packages(&window, options)),
            (AccountScope::Projects, _) => fragments.push(project_selection(
                &ProjectAddress::List(window),
                &config.projects,
                options,
            )),
            (AccountScope::All, _) => {}
        }
    }
    join_fragments(fragments)
}

pub fn account_query(
    account: &AccountTarget,
    config: &AccountQueryConfig,
    options: ComposeOptions,
) -> ComposedQuery {
    ComposedQuery::document(&account_root(
        account,
        &account_selection(account, config, options),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::graphql::repository::RepositoryQueryConfig;
    use crate::types::{PageSize, ProjectScope, RepositoryScope};

    fn account_scope(scope: AccountScope, page_size: i64) -> ScopeRequest<AccountScope> {
        ScopeRequest::new(scope, PageSize::new(page_size).unwrap())
    }

    #[test]
    fn test_root_follows_account_type() {
        let config = AccountQueryConfig::new(vec![account_scope(AccountScope::Info, 1)]);
        let organization = account_query(
            &AccountTarget::organization("acme"),
            &config,
            ComposeOptions::default(),
        );
        assert!(organization.as_str().contains("organization(login: \"acme\") {"));
        assert!(organization.as_str().contains("isVerified"));

        let user = account_query(&AccountTarget::user("octocat"), &config, ComposeOptions::default());
        assert!(user.as_str().contains("user(login: \"octocat\") {"));
        assert!(user.as_str().contains("company"));
        assert!(!user.as_str().contains("isVerified"));
    }

    #[test]
    fn test_implicit_essential_flag() {
        let config = AccountQueryConfig::new(vec![account_scope(AccountScope::Packages, 2)]);
        let account = AccountTarget::organization("acme");

        let plain = account_selection(&account, &config, ComposeOptions::default());
        assert!(!plain.contains("avatarUrl"));
        assert!(plain.contains("packages(first: 2, after: null) {"));

        let options = ComposeOptions {
            implicit_essential: true,
            ..ComposeOptions::default()
        };
        let with_essential = account_selection(&account, &config, options);
        assert!(with_essential.contains("avatarUrl"));
        assert!(with_essential.find("avatarUrl") < with_essential.find("packages("));

        let empty = account_selection(&account, &AccountQueryConfig::default(), options);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_projects_nest_project_and_repository_levels() {
        let projects = ProjectQueryConfig::new(
            vec![ScopeRequest::new(
                ProjectScope::Repositories,
                PageSize::new(4).unwrap(),
            )],
            RepositoryQueryConfig::new(vec![ScopeRequest::of(RepositoryScope::Count)]),
        );
        let config = AccountQueryConfig::new(vec![account_scope(AccountScope::Projects, 3)])
            .with_projects(projects);
        let text = account_query(
            &AccountTarget::organization("acme"),
            &config,
            ComposeOptions::default(),
        );
        assert!(text.as_str().contains("projectsV2(first: 3, after: null) {"));
        assert!(
            text.as_str()
                .contains("repositories(first: 4, after: null) {\ntotalCount\n}")
        );
    }

    #[test]
    fn test_projects_scope_absent_gates_project_level() {
        let projects = ProjectQueryConfig::new(
            vec![ScopeRequest::of(ProjectScope::Info)],
            RepositoryQueryConfig::default(),
        );
        let config = AccountQueryConfig::new(vec![account_scope(AccountScope::Essential, 1)])
            .with_projects(projects);
        let text = account_selection(
            &AccountTarget::organization("acme"),
            &config,
            ComposeOptions::default(),
        );
        assert!(!text.contains("projectsV2"));
    }
}
