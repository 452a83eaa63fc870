use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{self, FileConfig};
use crate::event;
use crate::pipeline::{self, Outcome};
use crate::projects::github::{GitHubProjects, DEFAULT_GRAPHQL_URL};
use crate::report::{self, Reporter};
use crate::resolver::{self, non_empty, ActionInputs};

/// Add the triggering issue or pull request to a GitHub project board.
///
/// Every flag falls back to the variable the Actions runner sets for the
/// matching action input.
#[derive(Debug, Parser)]
#[command(name = "add-to-project", version, about)]
pub struct Cli {
    /// Token with project write access [fallback: config file, then GITHUB_TOKEN]
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Number of the board, as shown in its URL
    #[arg(long, env = "INPUT_PROJECT-NUMBER")]
    pub project_number: Option<String>,

    /// Organization owning the board
    #[arg(long, env = "INPUT_ORGANIZATION")]
    pub organization: Option<String>,

    /// User owning the board
    #[arg(long, env = "INPUT_USER")]
    pub user: Option<String>,

    /// Comma-separated field names
    #[arg(long, env = "INPUT_FIELDS")]
    pub fields: Option<String>,

    /// Comma-separated field values, paired with --fields by position
    #[arg(long, env = "INPUT_FIELDS-VALUE")]
    pub fields_value: Option<String>,

    /// Event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// owner/name of the triggering repository
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GraphQL endpoint [default: https://api.github.com/graphql]
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_path: Option<PathBuf>,

    /// TOML config file with defaults for local runs
    #[arg(long, env = "ADD_TO_PROJECT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge flags with the config file. `fallback_token` is used last.
    pub fn into_inputs(self, file: &FileConfig, fallback_token: Option<String>) -> ActionInputs {
        let github_token = non_empty(self.github_token.as_deref())
            .or_else(|| non_empty(file.github_token.as_deref()))
            .or_else(|| non_empty(fallback_token.as_deref()));

        // Owner inputs travel as a pair so a file default never conflicts with a flag.
        let organization = non_empty(self.organization.as_deref());
        let user = non_empty(self.user.as_deref());
        let (organization, user) = if organization.is_some() || user.is_some() {
            (organization, user)
        } else {
            (file.organization.clone(), file.user.clone())
        };

        ActionInputs {
            github_token,
            project_number: self.project_number,
            organization,
            user,
            repository: self.repository,
            fields: self.fields,
            fields_value: self.fields_value,
            default_fields: file.field_assignments(),
        }
    }
}

fn env_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

/// One full run: resolve inputs, reconcile, publish step outputs.
pub async fn run<W: Write>(cli: Cli, reporter: &mut Reporter<W>) -> Result<Outcome> {
    let file = config::load_config(cli.config.as_deref())?;

    let graphql_url = non_empty(cli.graphql_url.as_deref())
        .or_else(|| non_empty(file.graphql_url.as_deref()))
        .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());
    let event_path = cli.event_path.clone();
    let output_path = cli.output_path.clone();

    let inputs = cli.into_inputs(&file, env_token());
    let ctx = resolver::resolve(&inputs, || event::load_payload(event_path.as_deref()))?;
    tracing::debug!(?ctx, "resolved invocation context");

    let api = GitHubProjects::new(ctx.token.expose(), graphql_url)?;
    let outcome = pipeline::reconcile(&ctx, &api, reporter).await?;

    if let Some(path) = output_path {
        report::write_step_outputs(
            &path,
            &[
                ("project-id", outcome.project.id.as_str()),
                ("item-id", outcome.item.id.as_str()),
            ],
        )?;
    }
    tracing::debug!(
        updated = outcome.updated_fields.len(),
        skipped = outcome.skipped_fields.len(),
        "run complete"
    );

    Ok(outcome)
}
