use serde::{Deserialize, Serialize};

use crate::github::graphql::fragments::{ISSUE_NODES, MILESTONE_INFO, connection};
use crate::github::graphql::{ComposeOptions, ScopeSet, join_fragments, selection};
use crate::types::{GrammaticalNumber, IssueState, MilestoneDepth, PageWindow};

/// Issues selected inside a milestone, one aliased block per state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueSelection {
    pub window: PageWindow,
    pub states: Vec<IssueState>,
}

impl Default for IssueSelection {
    fn default() -> Self {
        Self {
            window: PageWindow::nested(),
            states: vec![IssueState::Open],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneQueryConfig {
    pub number: GrammaticalNumber,
    /// Window of the milestone list, ignored when a single milestone is addressed.
    pub window: PageWindow,
    pub depth: Vec<MilestoneDepth>,
    pub issues: IssueSelection,
}

impl Default for MilestoneQueryConfig {
    fn default() -> Self {
        Self {
            number: GrammaticalNumber::Plural,
            window: PageWindow::nested(),
            depth: vec![MilestoneDepth::Info],
            issues: IssueSelection::default(),
        }
    }
}

/// Aliased issue blocks, `open_issues` before `closed_issues`.
///
/// A state that was not requested leaves no block behind.
pub fn issue_selection(issues: &IssueSelection, options: ComposeOptions) -> String {
    let states = ScopeSet::from_tags(&issues.states);
    join_fragments(states.tags().map(|state| {
        connection(
            &format!(
                "{}: issues({}, states: [{}])",
                state.alias(),
                issues.window.arguments(),
                state.graphql_name()
            ),
            options.include_total_count,
            ISSUE_NODES,
        )
    }))
}

/// Milestone selection relative to a repository node.
pub fn milestone_selection(config: &MilestoneQueryConfig, options: ComposeOptions) -> String {
    let depth = ScopeSet::from_tags(&config.depth);

    let mut fragments = vec!["number".to_string()];
    for tag in depth.tags() {
        match tag {
            MilestoneDepth::Info => fragments.push(MILESTONE_INFO.to_string()),
            MilestoneDepth::Issues => fragments.push(issue_selection(&config.issues, options)),
        }
    }
    let body = join_fragments(fragments);

    match config.number {
        GrammaticalNumber::Singular(number) => {
            selection(&format!("milestone(number: {})", number), &body)
        }
        GrammaticalNumber::Plural => connection(
            &format!("milestones({})", config.window.arguments()),
            options.include_total_count,
            &body,
        ),
    }
}
