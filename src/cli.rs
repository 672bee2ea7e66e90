use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::{Platform, VALID_PLATFORMS};

#[derive(Parser)]
#[command(name = "opsdeck")]
#[command(about = "Terminal dashboard for repositories, issues, and merge requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse issues
    #[command(visible_alias = "i")]
    Issues {
        /// Only show records for this repository
        #[arg(long)]
        repo: Option<String>,

        /// Load record fixtures from this directory instead of the
        /// bundled data
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Browse merge requests
    #[command(visible_alias = "mr")]
    MergeRequests {
        /// Only show records for this repository
        #[arg(long)]
        repo: Option<String>,

        /// Load record fixtures from this directory instead of the
        /// bundled data
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// List repositories, or connect a new one
    Repos {
        #[command(subcommand)]
        action: Option<RepoAction>,

        /// Load record fixtures from this directory instead of the
        /// bundled data
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show or change persisted preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RepoAction {
    /// Connect a repository (simulated; nothing is persisted)
    Add {
        /// Repository name, e.g. org/repo
        name: String,

        /// Platform: github, gitlab, self-hosted (default: github)
        #[arg(long, default_value = "github", value_parser = parse_platform)]
        platform: Platform,

        /// Instance URL (required for self-hosted)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current preferences
    Show,

    /// Set the active AI model
    SetModel {
        /// Model name, e.g. "Anthropic Claude 3"
        model: String,
    },

    /// Verify and store an API key (simulated verification)
    VerifyKey {
        /// Platform: github or gitlab
        #[arg(value_parser = parse_platform)]
        platform: Platform,

        /// The API key
        key: String,
    },

    /// Mark the repository data as loaded (simulated fetch)
    LoadData,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::from_str(s)
        .map_err(|_| format!("invalid platform '{}', expected one of: {}", s, VALID_PLATFORMS.join(", ")))
}

/// Print completions for the given shell to stdout.
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "opsdeck", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_issues_with_repo() {
        let cli = Cli::parse_from(["opsdeck", "issues", "--repo", "backend/api"]);
        match cli.command {
            Commands::Issues { repo, data } => {
                assert_eq!(repo.as_deref(), Some("backend/api"));
                assert!(data.is_none());
            }
            _ => panic!("expected issues command"),
        }
    }

    #[test]
    fn test_cli_merge_requests_alias() {
        let cli = Cli::parse_from(["opsdeck", "mr"]);
        assert!(matches!(cli.command, Commands::MergeRequests { .. }));
    }

    #[test]
    fn test_cli_config_verify_key() {
        let cli = Cli::parse_from(["opsdeck", "config", "verify-key", "gitlab", "glpat-123"]);
        match cli.command {
            Commands::Config {
                action: ConfigAction::VerifyKey { platform, key },
            } => {
                assert_eq!(platform, Platform::GitLab);
                assert_eq!(key, "glpat-123");
            }
            _ => panic!("expected config verify-key"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["opsdeck", "config", "verify-key", "bitbucket", "k"]).is_err());
    }

    #[test]
    fn test_cli_repos_add_platform_default() {
        let cli = Cli::parse_from(["opsdeck", "repos", "add", "org/repo"]);
        match cli.command {
            Commands::Repos {
                action: Some(RepoAction::Add { platform, .. }),
                ..
            } => assert_eq!(platform, Platform::GitHub),
            _ => panic!("expected repos add"),
        }
    }
}
