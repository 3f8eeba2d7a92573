use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use github_scope_query::config::ComposerConfig;
use github_scope_query::github::graphql::account::{AccountQueryConfig, account_query};
use github_scope_query::github::graphql::graphql_types::ComposedQuery;
use github_scope_query::github::graphql::project::{ProjectQueryConfig, project_query};
use github_scope_query::github::graphql::rate_limit::rate_limit_query;
use github_scope_query::github::graphql::repository::{RepositoryQueryConfig, repository_query};
use github_scope_query::services::{
    DEFAULT_ACCOUNT_SCOPES, DEFAULT_MILESTONE_DEPTH, DEFAULT_PROJECT_SCOPES,
    DEFAULT_REPOSITORY_SCOPES, ScopedFetcher, parse_scope_list, validate_cursor,
    validate_page_size, validate_project_body, validate_scopes,
};
use github_scope_query::types::{
    AccountTarget, Credential, Failure, GrammaticalNumber, IssueState, MilestoneDepth,
    MilestoneNumber, PageWindow, ProjectScopeBody, RepositoryId, ResultEnvelope, ScopeError,
    ScopeInput, TargetIdentity,
};

#[derive(Parser)]
#[command(name = "github-scope-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Compose scoped GitHub GraphQL queries for accounts, projects, repositories and milestones, and optionally execute them"
)]
#[command(
    long_about = "Scopes select which sub-resources of the Account -> Project -> Repository -> Milestone -> Issue graph end up in the query. Scope lists use the compact form 'tag[:pageSize[:cursor]],...' (e.g. 'license,topics:5:abc'). By default the composed document is printed; with --execute it is sent to GitHub and the result envelope is printed as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Send the composed query to GitHub and print the result envelope instead of the query
    #[arg(long, global = true)]
    execute: bool,
    /// GitHub access token (can also be set via GITHUB_SCOPE_GITHUB_TOKEN or GITHUB_TOKEN environment variables)
    #[arg(long, global = true)]
    github_token: Option<String>,
    /// Treat the token as a GitHub App installation token
    #[arg(long, global = true)]
    app: bool,
    /// Path to the composer config file (default: <config dir>/github-scope-query/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Request timeout in seconds for GitHub API calls
    #[arg(long, global = true)]
    request_timeout: Option<u64>,
}

#[derive(Args)]
struct AccountArgs {
    /// Organization or user login
    login: String,
    /// The login belongs to a user rather than an organization
    #[arg(long)]
    user: bool,
}

impl AccountArgs {
    fn target(&self) -> AccountTarget {
        if self.user {
            AccountTarget::user(self.login.as_str())
        } else {
            AccountTarget::organization(self.login.as_str())
        }
    }
}

#[derive(Args)]
struct RepositoryScopeArgs {
    /// Repository scopes (count, info, license, vulnerabilities, topics, labels, releases, deployments, languages, milestones, issues, all)
    #[arg(long)]
    repository_scopes: Option<String>,
    /// Issue states of milestone issues (open, closed); defaults to the configured states
    #[arg(long)]
    issue_states: Option<String>,
    /// Select a single milestone by number instead of the milestone list
    #[arg(long)]
    milestone: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose an organization or user query
    Account {
        #[command(flatten)]
        account: AccountArgs,
        /// Account scopes (essential, info, packages, projects, all)
        #[arg(long)]
        scopes: Option<String>,
        /// Project scopes applied to each project when the projects scope is requested (info, repositories)
        #[arg(long)]
        project_scopes: Option<String>,
        #[command(flatten)]
        repositories: RepositoryScopeArgs,
    },
    /// Compose a query for a single project, addressed by number or by name
    Project {
        #[command(flatten)]
        account: AccountArgs,
        /// Project number, or a name for a fuzzy lookup
        project: String,
        /// Project scopes (info, repositories)
        #[arg(long)]
        scopes: Option<String>,
        /// JSON file with a structured body ({"project_scopes": [...], "repository_scopes": [...]}), '-' for stdin
        #[arg(long, conflicts_with = "scopes")]
        body: Option<PathBuf>,
        #[command(flatten)]
        repositories: RepositoryScopeArgs,
    },
    /// Compose a query for a single repository
    Repository {
        /// Repository in 'owner/name' form
        repository: String,
        /// Repository scopes (count, info, license, vulnerabilities, topics, labels, releases, deployments, languages, milestones, issues, all)
        #[arg(long)]
        scopes: Option<String>,
        /// Issue states of milestone issues (open, closed); defaults to the configured states
        #[arg(long)]
        issue_states: Option<String>,
        /// Select a single milestone by number instead of the milestone list
        #[arg(long)]
        milestone: Option<u64>,
    },
    /// Compose a milestone query for a repository
    Milestones {
        /// Repository in 'owner/name' form
        repository: String,
        /// Select a single milestone by number instead of the milestone list
        #[arg(long)]
        number: Option<u64>,
        /// Milestone depth (info, issues)
        #[arg(long)]
        depth: Option<String>,
        /// Issue states (open, closed); defaults to the configured states
        #[arg(long)]
        issue_states: Option<String>,
        /// Page size of the milestone list (1-100)
        #[arg(long, default_value_t = 10)]
        page_size: i64,
        /// Milestone list cursor to continue after
        #[arg(long)]
        after: Option<String>,
        /// Page size of each issue block (1-100)
        #[arg(long, default_value_t = 10)]
        issues_page_size: i64,
        /// Issue cursor to continue after
        #[arg(long)]
        issues_after: Option<String>,
    },
    /// Compose the rate limit quota query
    Quota,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider early to prevent "no process-level CryptoProvider available" panics
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("github_scope_query=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ComposerConfig::load_from(path),
        None => ComposerConfig::load(),
    }
    .context("Failed to load composer configuration")?;
    if let Some(timeout) = cli.request_timeout {
        config.request_timeout_secs = Some(timeout);
    }

    let (query_name, query) = match compose(&cli.command, &config) {
        Ok(composed) => composed,
        Err(e) => match e.downcast::<ScopeError>() {
            Ok(scope_error) => {
                print_envelope(&ResultEnvelope::<Value>::Failure(Failure::from(scope_error)))?;
                std::process::exit(2);
            }
            Err(e) => return Err(e),
        },
    };

    if !cli.execute {
        println!("{}", query);
        return Ok(());
    }

    let credential = cli
        .github_token
        .or_else(|| env::var("GITHUB_SCOPE_GITHUB_TOKEN").ok())
        .or_else(|| env::var("GITHUB_TOKEN").ok())
        .filter(|token| !token.trim().is_empty())
        .map(|token| {
            if cli.app {
                Credential::installation_token(token)
            } else {
                Credential::token(token)
            }
        });

    let fetcher = ScopedFetcher::from_config(&config)?;
    let envelope = fetcher
        .execute::<Value>(query_name, &query, credential.as_ref())
        .await;
    print_envelope(&envelope)?;
    if !envelope.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_envelope(envelope: &ResultEnvelope<Value>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

fn scope_input(text: &Option<String>) -> Option<ScopeInput> {
    text.as_deref().map(ScopeInput::from)
}

fn issue_states(text: &Option<String>, config: &ComposerConfig) -> Result<Vec<IssueState>, ScopeError> {
    validate_scopes(scope_input(text).as_ref(), &config.default_issue_states)
}

fn milestone_number(number: Option<u64>) -> GrammaticalNumber {
    number
        .map(|n| GrammaticalNumber::Singular(MilestoneNumber::new(n)))
        .unwrap_or_default()
}

fn repository_config(
    args: &RepositoryScopeArgs,
    config: &ComposerConfig,
) -> Result<RepositoryQueryConfig, ScopeError> {
    let scopes = parse_scope_list(
        args.repository_scopes.as_deref().unwrap_or_default(),
        DEFAULT_REPOSITORY_SCOPES,
        config.default_page_size,
    )?;
    Ok(RepositoryQueryConfig::new(scopes)
        .with_milestone(milestone_number(args.milestone))
        .with_issue_states(issue_states(&args.issue_states, config)?))
}

fn read_project_body(path: &Path) -> Result<ProjectScopeBody> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read body from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read body file {}", path.display()))?
    };
    serde_json::from_str(&content).context("Failed to parse project body")
}

/// Validates the command's scopes and composes its document.
///
/// Validation failures surface as [`ScopeError`] inside the returned error.
fn compose(command: &Commands, config: &ComposerConfig) -> Result<(&'static str, ComposedQuery)> {
    let options = config.compose_options();
    let composed = match command {
        Commands::Account {
            account,
            scopes,
            project_scopes,
            repositories,
        } => {
            let account_scopes = parse_scope_list(
                scopes.as_deref().unwrap_or_default(),
                DEFAULT_ACCOUNT_SCOPES,
                config.default_page_size,
            )?;
            let projects = ProjectQueryConfig::new(
                parse_scope_list(
                    project_scopes.as_deref().unwrap_or_default(),
                    DEFAULT_PROJECT_SCOPES,
                    config.default_page_size,
                )?,
                repository_config(repositories, config)?,
            );
            let query_config = AccountQueryConfig::new(account_scopes).with_projects(projects);
            ("account", account_query(&account.target(), &query_config, options))
        }
        Commands::Project {
            account,
            project,
            scopes,
            body,
            repositories,
        } => {
            let query_config = match body {
                Some(path) => {
                    let body = read_project_body(path)?;
                    validate_project_body(
                        &body,
                        &config.default_issue_states,
                        config.default_page_size,
                    )?
                }
                None => ProjectQueryConfig::new(
                    parse_scope_list(
                        scopes.as_deref().unwrap_or_default(),
                        DEFAULT_PROJECT_SCOPES,
                        config.default_page_size,
                    )?,
                    repository_config(repositories, config)?,
                ),
            };
            (
                "project",
                project_query(
                    &account.target(),
                    &TargetIdentity::parse(project),
                    &query_config,
                    options,
                ),
            )
        }
        Commands::Repository {
            repository,
            scopes,
            issue_states: states,
            milestone,
        } => {
            let repository_id = parse_repository(repository)?;
            let query_config = RepositoryQueryConfig::new(parse_scope_list(
                scopes.as_deref().unwrap_or_default(),
                DEFAULT_REPOSITORY_SCOPES,
                config.default_page_size,
            )?)
            .with_milestone(milestone_number(*milestone))
            .with_issue_states(issue_states(states, config)?);
            ("repository", repository_query(&repository_id, &query_config, options))
        }
        Commands::Milestones {
            repository,
            number,
            depth,
            issue_states: states,
            page_size,
            after,
            issues_page_size,
            issues_after,
        } => {
            let repository_id = parse_repository(repository)?;
            let depth: Vec<MilestoneDepth> =
                validate_scopes(scope_input(depth).as_ref(), DEFAULT_MILESTONE_DEPTH)?;
            let milestones_window = PageWindow::new(
                validate_page_size(&Value::from(*page_size))?,
                validate_cursor(after.as_deref()),
            );
            let issues_window = PageWindow::new(
                validate_page_size(&Value::from(*issues_page_size))?,
                validate_cursor(issues_after.as_deref()),
            );
            let query_config = RepositoryQueryConfig::for_milestones(
                milestone_number(*number),
                &depth,
                &milestones_window,
                &issues_window,
                issue_states(states, config)?,
            );
            ("milestones", repository_query(&repository_id, &query_config, options))
        }
        Commands::Quota => ("rate_limit", rate_limit_query()),
    };
    Ok(composed)
}

fn parse_repository(repository: &str) -> Result<RepositoryId> {
    RepositoryId::parse_str(repository).map_err(|e| anyhow::anyhow!(e))
}
