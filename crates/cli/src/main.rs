//! BoardSweeper CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Read inputs** — flags, or the GitHub Actions `INPUT_*` environment
//!    variables, validated once into [`board::SweepConfig`] and
//!    [`github::GithubConfig`].
//! 2. **Wire observability** — configure `tracing-subscriber` with a text or
//!    JSON layer and, when configured, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** — create the GitHub board and health
//!    adapters and inject them into a [`sweep::Sweeper`].
//! 4. **Report** — print a one-line JSON summary on standard output and exit
//!    `0` on success or a skipped run, `1` on any error.

mod observability;

use std::process::ExitCode;
use std::sync::Arc;

use board::{SweepConfig, SweepInputs};
use clap::Parser;
use github::{GithubConfig, GithubProjectBoard, HttpDeployHealth, DEFAULT_API_BASE_URL};
use serde_json::json;
use sweep::{SweepOutcome, Sweeper};

use crate::observability::LogFormat;

/// Moves QA cards to Done after a recent deploy and trims the Done column.
#[derive(Debug, Parser)]
#[command(name = "board-sweeper", version, about)]
struct Cli {
    /// Repository owning the project board, as `owner/repo`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Name of the project board.
    #[arg(long, env = "INPUT_PROJECT_NAME")]
    project_name: String,

    /// Column that receives QA cards and is trimmed to the limit.
    #[arg(long, env = "INPUT_DONE_COLUMN_NAME")]
    done_column_name: String,

    /// Column whose cards are moved to Done.
    #[arg(long, env = "INPUT_QA_COLUMN_NAME")]
    qa_column_name: String,

    /// Number of cards the Done column keeps.
    #[arg(long, env = "INPUT_DONE_COLUMN_CARD_LIMIT")]
    done_column_card_limit: String,

    /// Board API token.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: String,

    /// Endpoint returning `{"latest_deploy_time": "..."}`.
    #[arg(long, env = "INPUT_HEALTH_URL")]
    health_url: String,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Read the board and report what would change without changing it.
    #[arg(long, env = "INPUT_DRY_RUN")]
    dry_run: bool,

    /// Log output format.
    #[arg(long, value_enum, env = "BOARD_SWEEPER_LOG_FORMAT", default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    fn sweep_inputs(&self) -> SweepInputs {
        SweepInputs {
            repository: self.repository.clone(),
            project_name: self.project_name.clone(),
            done_column_name: self.done_column_name.clone(),
            qa_column_name: self.qa_column_name.clone(),
            done_column_card_limit: self.done_column_card_limit.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let telemetry = match observability::init(cli.log_format) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let status = conclude(run(&cli).await);

    telemetry.shutdown();
    ExitCode::from(status)
}

/// Reports a finished run and returns the process exit status.
///
/// Completed and skipped runs print their summary and exit `0`; any error is
/// logged to standard error and exits `1`.
fn conclude(result: anyhow::Result<SweepOutcome>) -> u8 {
    match result {
        Ok(outcome) => {
            println!("{}", summary(&outcome));
            0
        }
        Err(err) => {
            tracing::error!(error = %err, "board sweep failed");
            1
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<SweepOutcome> {
    let config = SweepConfig::from_inputs(&cli.sweep_inputs())?;
    let connection = GithubConfig::new(cli.token.as_str(), &cli.api_url, &cli.health_url)?;

    let board = Arc::new(GithubProjectBoard::new(&connection)?);
    let health = Arc::new(HttpDeployHealth::new(&connection)?);

    let sweeper = Sweeper::new(board, health, config).with_dry_run(cli.dry_run);
    Ok(sweeper.run().await?)
}

fn summary(outcome: &SweepOutcome) -> serde_json::Value {
    match outcome {
        SweepOutcome::SkippedStaleDeploy { deployed_at } => json!({
            "status": "skipped",
            "reason": "no recent deploy",
            "latest_deploy_time": deployed_at.to_string(),
        }),
        SweepOutcome::Completed(report) => json!({
            "status": "completed",
            "report": report,
        }),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
