//! Upstream credentials as resolved by the authentication collaborator

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the credential was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AuthStrategy {
    /// Personal access token
    Token,
    /// GitHub App installation
    App,
}

/// Raw credential value: an access token or a numeric installation id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthValue {
    Installation(u64),
    Token(String),
}

impl std::fmt::Debug for AuthValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Installation(id) => f.debug_tuple("Installation").field(id).finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Credential handed to the transport untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub auth: AuthValue,
    pub auth_type: AuthStrategy,
}

impl Credential {
    pub fn token<T: Into<String>>(token: T) -> Self {
        Self {
            auth: AuthValue::Token(token.into()),
            auth_type: AuthStrategy::Token,
        }
    }

    /// App installation credential carrying an already issued installation token.
    pub fn installation_token<T: Into<String>>(token: T) -> Self {
        Self {
            auth: AuthValue::Token(token.into()),
            auth_type: AuthStrategy::App,
        }
    }

    pub fn installation(installation_id: u64) -> Self {
        Self {
            auth: AuthValue::Installation(installation_id),
            auth_type: AuthStrategy::App,
        }
    }
}
