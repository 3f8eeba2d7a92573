//! Scope catalog
//!
//! Closed sets of scope tags for every level of the resource graph
//! (Account → Project → Repository → Milestone → Issue). The declaration order of each
//! enum is its canonical catalog order: composers walk tags in that order, never in
//! the order a caller listed them.

use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Level of the resource graph a scope tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    #[strum(serialize = "account")]
    Account,
    #[strum(serialize = "project")]
    Project,
    #[strum(serialize = "repository")]
    Repository,
    #[strum(serialize = "milestone depth")]
    MilestoneDepth,
    #[strum(serialize = "issue state")]
    IssueState,
}

/// Errors raised while validating caller supplied scopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("invalid {level} scope '{value}' (allowed: {allowed})")]
    InvalidScope {
        level: ScopeLevel,
        value: String,
        allowed: String,
    },
    #[error("invalid page size '{value}' (expected an integer between 1 and 100)")]
    InvalidPageSize { value: String },
}

/// A tag from one of the closed scope sets.
///
/// `FromStr` accepts exactly the lowercase wire names, `Ord` follows the catalog order.
pub trait ScopeTag:
    Copy
    + Eq
    + Ord
    + Hash
    + std::fmt::Debug
    + std::fmt::Display
    + FromStr
    + IntoEnumIterator
    + Into<&'static str>
    + 'static
{
    const LEVEL: ScopeLevel;

    /// Whether this tag stands for every other tag of its level.
    fn is_all(self) -> bool {
        false
    }

    /// Whether this tag requests the bare total count of its level.
    fn is_count(self) -> bool {
        false
    }

    fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parses a single wire name, reporting the allowed values on failure.
    fn parse_tag(value: &str) -> Result<Self, ScopeError> {
        Self::from_str(value).map_err(|_| ScopeError::InvalidScope {
            level: Self::LEVEL,
            value: value.to_string(),
            allowed: allowed_values::<Self>(),
        })
    }
}

/// Comma separated list of every wire name of a level, in catalog order.
pub fn allowed_values<S: ScopeTag>() -> String {
    S::iter().map(S::as_str).collect::<Vec<_>>().join(", ")
}

/// Scopes of an organization or user account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountScope {
    Essential,
    Info,
    Packages,
    Projects,
    All,
}

impl ScopeTag for AccountScope {
    const LEVEL: ScopeLevel = ScopeLevel::Account;

    fn is_all(self) -> bool {
        self == Self::All
    }
}

/// Scopes of a project (v2).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectScope {
    Info,
    /// Repositories linked to the project. Gates every repository scope.
    Repositories,
}

impl ScopeTag for ProjectScope {
    const LEVEL: ScopeLevel = ScopeLevel::Project;
}

/// Scopes of a repository.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RepositoryScope {
    Count,
    Info,
    License,
    Vulnerabilities,
    Topics,
    Labels,
    Releases,
    Deployments,
    Languages,
    Milestones,
    Issues,
    All,
}

impl ScopeTag for RepositoryScope {
    const LEVEL: ScopeLevel = ScopeLevel::Repository;

    fn is_all(self) -> bool {
        self == Self::All
    }

    fn is_count(self) -> bool {
        self == Self::Count
    }
}

/// How deep a milestone request reaches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MilestoneDepth {
    Info,
    Issues,
}

impl ScopeTag for MilestoneDepth {
    const LEVEL: ScopeLevel = ScopeLevel::MilestoneDepth;
}

/// Issue state filter applied to milestone issues.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Upper-cased enum value of the upstream schema.
    pub fn graphql_name(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    /// Alias under which issues of this state are selected.
    pub fn alias(self) -> &'static str {
        match self {
            Self::Open => "open_issues",
            Self::Closed => "closed_issues",
        }
    }
}

impl ScopeTag for IssueState {
    const LEVEL: ScopeLevel = ScopeLevel::IssueState;
}
