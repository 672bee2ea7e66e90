//! Command entry points called from `main`.

pub mod browse;
pub mod config;
pub mod repos;

pub use browse::{cmd_issues, cmd_merge_requests};
pub use config::{cmd_config_load_data, cmd_config_set_model, cmd_config_show, cmd_config_verify_key};
pub use repos::{cmd_repo_add, cmd_repos};
