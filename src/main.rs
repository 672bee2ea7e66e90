use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;

use opsdeck::cli::{Cli, Commands, ConfigAction, RepoAction};
use opsdeck::commands::{
    cmd_config_load_data, cmd_config_set_model, cmd_config_show, cmd_config_verify_key,
    cmd_issues, cmd_merge_requests, cmd_repo_add, cmd_repos,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Issues { repo, data } => cmd_issues(repo, data),
        Commands::MergeRequests { repo, data } => cmd_merge_requests(repo, data),
        Commands::Repos { action, data } => match action {
            None => cmd_repos(data),
            Some(RepoAction::Add {
                name,
                platform,
                url,
            }) => cmd_repo_add(&name, platform, url.as_deref()),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::SetModel { model } => cmd_config_set_model(&model),
            ConfigAction::VerifyKey { platform, key } => cmd_config_verify_key(platform, &key),
            ConfigAction::LoadData => cmd_config_load_data(),
        },
        Commands::Completions { shell } => {
            opsdeck::cli::generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
