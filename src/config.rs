//! Composer configuration
//!
//! Loaded from a TOML file and overridden by environment variables.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`GITHUB_SCOPE_*`)
//! 2. Config file (`<config dir>/github-scope-query/config.toml`)
//! 3. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::debug;

use crate::github::graphql::ComposeOptions;
use crate::types::{IssueState, PageSize, ScopeTag};

pub const ENV_DEV_MODE: &str = "GITHUB_SCOPE_DEV_MODE";
pub const ENV_IMPLICIT_ESSENTIAL: &str = "GITHUB_SCOPE_IMPLICIT_ESSENTIAL";
pub const ENV_DEFAULT_ISSUE_STATES: &str = "GITHUB_SCOPE_DEFAULT_ISSUE_STATES";
pub const ENV_MAX_RETRIES: &str = "GITHUB_SCOPE_MAX_RETRIES";
pub const ENV_REQUEST_TIMEOUT: &str = "GITHUB_SCOPE_REQUEST_TIMEOUT";
pub const ENV_API_BASE_URL: &str = "GITHUB_SCOPE_API_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Emit `totalCount` on every paginated connection.
    pub debug_total_count: bool,
    /// Always add the `essential` account scope next to other account scopes.
    pub implicit_essential: bool,
    /// Issue states used when a milestone request names none.
    pub default_issue_states: Vec<IssueState>,
    /// Page size of scope requests that omit one.
    pub default_page_size: PageSize,
    /// Extra attempts after an `UpstreamInternal` failure. Zero means a single attempt.
    pub max_retries: u32,
    pub request_timeout_secs: Option<u64>,
    /// GitHub API root, e.g. a GitHub Enterprise endpoint.
    pub api_base_url: Option<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            debug_total_count: false,
            implicit_essential: false,
            default_issue_states: vec![IssueState::Open],
            default_page_size: PageSize::DEFAULT,
            max_retries: 0,
            request_timeout_secs: None,
            api_base_url: None,
        }
    }
}

impl ComposerConfig {
    /// Loads the default config file if present, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                Ok(config)
            }
        }
    }

    /// Loads `path` (defaults when it does not exist), then applies environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.is_file() {
            debug!("Loading config from: {}", path.display());
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides()?;
        debug!("Loaded composer configuration: {:?}", config);
        Ok(config)
    }

    /// Parses a config file without environment overrides.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(ENV_DEV_MODE) {
            self.debug_total_count = parse_flag(ENV_DEV_MODE, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_IMPLICIT_ESSENTIAL) {
            self.implicit_essential = parse_flag(ENV_IMPLICIT_ESSENTIAL, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_DEFAULT_ISSUE_STATES) {
            self.default_issue_states = value
                .split(',')
                .map(str::trim)
                .filter(|state| !state.is_empty())
                .map(|state| {
                    IssueState::parse_tag(state).map_err(|e| ConfigError::InvalidValue {
                        key: ENV_DEFAULT_ISSUE_STATES.to_string(),
                        value: value.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Ok(value) = std::env::var(ENV_MAX_RETRIES) {
            self.max_retries = parse_number(ENV_MAX_RETRIES, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = Some(parse_number(ENV_REQUEST_TIMEOUT, &value)?);
        }
        if let Ok(value) = std::env::var(ENV_API_BASE_URL) {
            self.api_base_url = Some(value).filter(|url| !url.trim().is_empty());
        }
        Ok(())
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            include_total_count: self.debug_total_count,
            implicit_essential: self.implicit_essential,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// `~/.config/github-scope-query/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join("github-scope-query")
            .join("config.toml"),
    )
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a non-negative integer".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComposerConfig::default();
        assert_eq!(config.default_issue_states, vec![IssueState::Open]);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.compose_options(), ComposeOptions::default());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ComposerConfig = toml::from_str(
            r#"
            debug_total_count = true
            default_issue_states = ["open", "closed"]
            request_timeout_secs = 20
            "#,
        )
        .unwrap();
        assert!(config.compose_options().include_total_count);
        assert!(!config.implicit_essential);
        assert_eq!(
            config.default_issue_states,
            vec![IssueState::Open, IssueState::Closed]
        );
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.default_page_size, PageSize::DEFAULT);
    }

    #[test]
    fn test_out_of_range_page_size_is_rejected() {
        let result: Result<ComposerConfig, _> = toml::from_str("default_page_size = 0");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("K", "TRUE").ok(), Some(true));
        assert_eq!(parse_flag("K", "0").ok(), Some(false));
        assert!(parse_flag("K", "maybe").is_err());
    }
}
