use serde::{Deserialize, Serialize};

use crate::github::graphql::fragments::{
    LICENSE, REPOSITORY_INFO, connection, deployments, labels, languages, releases, topics,
    vulnerabilities,
};
use crate::github::graphql::graphql_types::ComposedQuery;
use crate::github::graphql::milestone::{IssueSelection, MilestoneQueryConfig, milestone_selection};
use crate::github::graphql::{ComposeOptions, ScopeSet, join_fragments, quote_string, selection};
use crate::types::{
    GrammaticalNumber, IssueState, MilestoneDepth, PageWindow, RepositoryId, RepositoryScope,
    ScopeRequest,
};

/// Everything needed to compose the selection of a repository node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryQueryConfig {
    pub scopes: Vec<ScopeRequest<RepositoryScope>>,
    /// Single milestone or the milestone list, used when milestones or issues are requested.
    #[serde(default)]
    pub milestone: GrammaticalNumber,
    /// Window of the milestone list when only the `issues` scope reaches the milestone level.
    #[serde(default)]
    pub milestone_window: Option<PageWindow>,
    /// Issue states of the issue blocks; empty means open issues only.
    #[serde(default)]
    pub issue_states: Vec<IssueState>,
}

impl RepositoryQueryConfig {
    pub fn new(scopes: Vec<ScopeRequest<RepositoryScope>>) -> Self {
        Self {
            scopes,
            ..Self::default()
        }
    }

    /// Repository config of a milestone entry point.
    ///
    /// `info` depth requests the milestone fields and `issues` depth the issue blocks.
    /// `milestones_window` pages the milestone list and `issues_window` every issue block.
    pub fn for_milestones(
        milestone: GrammaticalNumber,
        depth: &[MilestoneDepth],
        milestones_window: &PageWindow,
        issues_window: &PageWindow,
        issue_states: Vec<IssueState>,
    ) -> Self {
        let scopes = ScopeSet::from_tags(depth)
            .tags()
            .map(|tag| {
                let (scope, window) = match tag {
                    MilestoneDepth::Info => (RepositoryScope::Milestones, milestones_window),
                    MilestoneDepth::Issues => (RepositoryScope::Issues, issues_window),
                };
                ScopeRequest::new(scope, window.page_size).with_cursor(window.continue_after.clone())
            })
            .collect();
        Self {
            scopes,
            milestone,
            milestone_window: Some(milestones_window.clone()),
            issue_states,
        }
    }

    pub fn with_milestone(mut self, milestone: GrammaticalNumber) -> Self {
        self.milestone = milestone;
        self
    }

    pub fn with_issue_states(mut self, issue_states: Vec<IssueState>) -> Self {
        self.issue_states = issue_states;
        self
    }
}

/// Milestone child of a repository, present when milestones or issues were requested.
fn milestone_child(
    scopes: &ScopeSet<RepositoryScope>,
    config: &RepositoryQueryConfig,
) -> Option<MilestoneQueryConfig> {
    let milestones = scopes.window(RepositoryScope::Milestones);
    let issues = scopes.window(RepositoryScope::Issues);
    if milestones.is_none() && issues.is_none() {
        return None;
    }

    let mut depth = Vec::new();
    if milestones.is_some() {
        depth.push(MilestoneDepth::Info);
    }
    if issues.is_some() {
        depth.push(MilestoneDepth::Issues);
    }

    let states = if config.issue_states.is_empty() {
        vec![IssueState::Open]
    } else {
        config.issue_states.clone()
    };

    Some(MilestoneQueryConfig {
        number: config.milestone,
        window: milestones
            .or(config.milestone_window.as_ref())
            .cloned()
            .unwrap_or_else(PageWindow::nested),
        depth,
        issues: IssueSelection {
            window: issues.cloned().unwrap_or_else(PageWindow::nested),
            states,
        },
    })
}

fn repository_body(
    scopes: &ScopeSet<RepositoryScope>,
    config: &RepositoryQueryConfig,
    options: ComposeOptions,
) -> String {
    let mut fragments = vec!["name".to_string()];
    let mut milestone_spliced = false;

    for tag in scopes.tags() {
        let window = scopes.window_or_nested(tag);
        match tag {
            RepositoryScope::Count | RepositoryScope::All => {}
            RepositoryScope::Info => fragments.push(REPOSITORY_INFO.to_string()),
            RepositoryScope::License => fragments.push(LICENSE.to_string()),
            RepositoryScope::Vulnerabilities => fragments.push(vulnerabilities(&window, options)),
            RepositoryScope::Topics => fragments.push(topics(&window, options)),
            RepositoryScope::Labels => fragments.push(labels(&window, options)),
            RepositoryScope::Releases => fragments.push(releases(&window, options)),
            RepositoryScope::Deployments => fragments.push(deployments(&window, options)),
            RepositoryScope::Languages => fragments.push(languages(&window, options)),
            RepositoryScope::Milestones | RepositoryScope::Issues => {
                if !milestone_spliced {
                    milestone_spliced = true;
                    if let Some(milestone) = milestone_child(scopes, config) {
                        fragments.push(milestone_selection(&milestone, options));
                    }
                }
            }
        }
    }

    join_fragments(fragments)
}

/// Field selection of one repository node.
pub fn repository_selection(config: &RepositoryQueryConfig, options: ComposeOptions) -> String {
    let scopes = ScopeSet::resolve(&config.scopes);
    repository_body(&scopes, config, options)
}

/// Repositories linked to a project, paginated by `window`.
///
/// A lone `count` collapses the connection to its total count; `count` next to other
/// scopes adds the total count to the full connection.
pub fn linked_repositories_selection(
    window: &PageWindow,
    config: &RepositoryQueryConfig,
    options: ComposeOptions,
) -> String {
    let scopes = ScopeSet::resolve(&config.scopes);
    let head = format!("repositories({})", window.arguments());

    if scopes.is_count_only() {
        return selection(&head, "totalCount");
    }

    connection(
        &head,
        options.include_total_count || scopes.has_count(),
        &repository_body(&scopes, config, options),
    )
}

/// Document rooted at `repository(owner: .., name: ..)`.
///
/// A single repository has no connection to count, so `count` adds nothing here; the
/// count-only collapse applies to [`linked_repositories_selection`].
pub fn repository_query(
    repository: &RepositoryId,
    config: &RepositoryQueryConfig,
    options: ComposeOptions,
) -> ComposedQuery {
    let head = format!(
        "repository(owner: {}, name: {})",
        quote_string(repository.owner.as_str()),
        quote_string(repository.repository_name.as_str())
    );
    ComposedQuery::document(&selection(&head, &repository_selection(config, options)))
}
