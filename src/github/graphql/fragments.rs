//! Field fragment library
//!
//! One selection block per scope tag. The field lists are fixed; only the pagination
//! window of a fragment's own collection is substituted.

use super::scope_set::ComposeOptions;
use super::selection;
use crate::types::PageWindow;

pub const PAGE_INFO: &str = r#"pageInfo {
    endCursor
    hasNextPage
}"#;

/// Paginated connection: `head { totalCount? pageInfo { .. } nodes { .. } }`.
pub fn connection(head: &str, include_total_count: bool, nodes: &str) -> String {
    let total_count = if include_total_count { "totalCount" } else { "" };
    selection(
        head,
        &format!(
            "{}\n{}\n{}",
            total_count,
            PAGE_INFO,
            selection("nodes", nodes)
        ),
    )
}

/// Connection of a scope fragment, paginated by that scope's own window.
fn scoped_connection(
    field: &str,
    window: &PageWindow,
    options: ComposeOptions,
    nodes: &str,
) -> String {
    connection(
        &format!("{}({})", field, window.arguments()),
        options.include_total_count,
        nodes,
    )
}

/* ACCOUNT */

pub const ORGANIZATION_ESSENTIAL: &str = r#"
    name
    description
    url
    avatarUrl
"#;

pub const USER_ESSENTIAL: &str = r#"
    name
    bio
    url
    avatarUrl
"#;

pub const ORGANIZATION_INFO: &str = r#"
    email
    websiteUrl
    location
    createdAt
    updatedAt
    isVerified
    announcement
"#;

pub const USER_INFO: &str = r#"
    email
    websiteUrl
    location
    company
    pronouns
    createdAt
    updatedAt
"#;

const PACKAGE_NODES: &str = r#"
    name
    packageType
    latestVersion {
        version
        platform
        preRelease
        readme
        files(first: 10) {
            nodes {
                name
                sha256
                size
                updatedAt
                url
            }
        }
    }
"#;

pub fn packages(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("packages", window, options, PACKAGE_NODES)
}

/* PROJECT */

pub const PROJECT_INFO: &str = r#"
    shortDescription
    url
    public
    closed
    createdAt
    updatedAt
    closedAt
    readme
"#;

/* REPOSITORY */

pub const REPOSITORY_INFO: &str = r#"
    description
    url
    homepageUrl
    sshUrl
    resourcePath
    createdAt
    updatedAt
    isArchived
    isPrivate
    isTemplate
"#;

pub const LICENSE: &str = r#"
licenseInfo {
    url
    spdxId
    name
    nickname
    description
    conditions {
        key
        label
        description
    }
}
"#;

const VULNERABILITY_NODES: &str = r#"
    createdAt
    fixedAt
    dependencyScope
    securityVulnerability {
        vulnerableVersionRange
        updatedAt
        advisory {
            classification
            summary
            description
            publishedAt
            updatedAt
        }
        firstPatchedVersion {
            identifier
        }
        package {
            ecosystem
            name
        }
    }
"#;

pub fn vulnerabilities(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("vulnerabilityAlerts", window, options, VULNERABILITY_NODES)
}

const TOPIC_NODES: &str = r#"
    url
    topic {
        name
    }
"#;

pub fn topics(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("repositoryTopics", window, options, TOPIC_NODES)
}

const LABEL_NODES: &str = r#"
    name
    color
    description
    createdAt
    url
"#;

pub fn labels(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("labels", window, options, LABEL_NODES)
}

const RELEASE_NODES: &str = r#"
    name
    tagName
    description
    url
    createdAt
    updatedAt
    isDraft
    isLatest
    isPrerelease
    author {
        login
        name
        avatarUrl
        url
    }
    tagCommit {
        oid
        authoredDate
        additions
        deletions
    }
    releaseAssets(first: 10) {
        nodes {
            name
            contentType
            size
            downloadCount
            createdAt
            updatedAt
        }
    }
"#;

pub fn releases(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("releases", window, options, RELEASE_NODES)
}

const DEPLOYMENT_NODES: &str = r#"
    createdAt
    updatedAt
    description
    environment
    task
    commit {
        oid
        authoredDate
    }
    latestStatus {
        state
        description
        logUrl
        environmentUrl
        createdAt
        updatedAt
    }
    statuses(first: 10) {
        nodes {
            state
            description
            logUrl
            environmentUrl
            createdAt
        }
    }
"#;

pub fn deployments(window: &PageWindow, options: ComposeOptions) -> String {
    scoped_connection("deployments", window, options, DEPLOYMENT_NODES)
}

const LANGUAGE_NODES: &str = r#"
    name
    color
"#;

pub fn languages(window: &PageWindow, options: ComposeOptions) -> String {
    format!(
        "{}\n{}",
        selection("primaryLanguage", LANGUAGE_NODES),
        scoped_connection("languages", window, options, LANGUAGE_NODES)
    )
}

/* MILESTONE */

pub const MILESTONE_INFO: &str = r#"
    title
    description
    state
    url
    dueOn
    progressPercentage
    createdAt
    updatedAt
    closedAt
"#;

/* ISSUE */

pub const ISSUE_NODES: &str = r#"
    number
    title
    url
    state
    body
    bodyUrl
    createdAt
    updatedAt
    closedAt
    lastEditedAt
    assignees(first: 10) {
        nodes {
            login
            name
            avatarUrl
            url
        }
    }
    labels(first: 10) {
        nodes {
            name
            color
            description
            isDefault
            url
        }
    }
"#;
