//! Account and repository identifiers used as composer roots

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Owner name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Repository name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RepositoryName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of account a login belongs to. Displays as the root field of the upstream schema.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountType {
    #[default]
    Organization,
    User,
}

/// Root of every account scoped document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountTarget {
    pub login: Owner,
    pub account_type: AccountType,
}

impl AccountTarget {
    pub fn organization<T: Into<Owner>>(login: T) -> Self {
        Self {
            login: login.into(),
            account_type: AccountType::Organization,
        }
    }

    pub fn user<T: Into<Owner>>(login: T) -> Self {
        Self {
            login: login.into(),
            account_type: AccountType::User,
        }
    }
}

/// Repository addressed by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new(owner: String, repository_name: String) -> Self {
        Self {
            owner: Owner::new(owner),
            repository_name: RepositoryName::new(repository_name),
        }
    }

    /// Parses the `owner/name` shorthand.
    pub fn parse_str(input: &str) -> Result<Self, String> {
        let trimmed = input.trim().trim_end_matches('/');
        match trimmed.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner.to_string(), name.to_string()))
            }
            _ => Err(format!(
                "Invalid repository '{}'. Expected format: 'owner/name'",
                input
            )),
        }
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository_name)
    }
}
