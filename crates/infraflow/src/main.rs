mod confirm;
mod providers;
mod report;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use infraflow_cloud::{Action, Environment, Provider};
use infraflow_config::ProjectLayout;
use infraflow_core::{Capabilities, Orchestrator, RunRequest};
use infraflow_engine::{Kubectl, Terraform, WhichProbe};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "infraflow", version)]
#[command(
    about = "Provision cloud infrastructure and roll out the platform's manifests",
    long_about = None
)]
struct Cli {
    /// Environment to provision (production, staging, development, ...)
    #[arg(env = "INFRAFLOW_ENV", default_value = "production", value_parser = Environment::from_str)]
    environment: Environment,

    /// Cloud provider: aws, gcp or azure
    #[arg(env = "INFRAFLOW_PROVIDER", default_value = "aws", value_parser = Provider::from_str)]
    provider: Provider,

    /// Lifecycle action: plan, apply or destroy
    #[arg(default_value = "plan", value_parser = Action::from_str)]
    action: Action,

    /// Project root (defaults to the nearest directory holding infraflow.yaml)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Configuration file (defaults to <project root>/infraflow.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            // Nowhere left to report a failed write; logging starts after parsing
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ infraflow could not start".red().bold());
            eprintln!("  {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

/// Logs go to stderr; `--verbose` wins over RUST_LOG
fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let project_root = infraflow_config::find_project_root(cli.project_root.as_deref())?;
    let config = infraflow_config::load_config(&project_root, cli.config.as_deref())?;
    let layout = ProjectLayout::new(&project_root, &config);
    tracing::debug!(project_root = %project_root.display(), project = %config.project, "Loaded configuration");

    report::print_header(&config, &layout, &cli.environment, cli.provider, cli.action);

    let provider = providers::build(cli.provider, &config);
    let engine = Terraform::with_binary(config.engine.clone()).streaming(true);
    let cluster = Kubectl::new();
    let confirmation = confirm::StdinConfirmation;

    let orchestrator = Orchestrator::new(
        &config,
        &layout,
        Capabilities {
            probe: &WhichProbe,
            engine: &engine,
            provider: provider.as_ref(),
            cluster: &cluster,
            confirmation: &confirmation,
        },
    );

    let outcome = orchestrator
        .run(RunRequest {
            environment: cli.environment,
            action: cli.action,
        })
        .await;

    report::print_outcome(&outcome, &layout);
    Ok(outcome.exit_code())
}
