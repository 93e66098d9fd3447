mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::classify::{self, ClassifyArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::tickets::{self, TicketsArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::glpi::GlpiClient;
use crate::infra::openai::OpenAiClient;
use crate::services::{ClassifierService, TicketService};

#[derive(Parser)]
#[command(
    name = "eisen",
    author,
    version,
    about = "Eisenhower task classifier and GLPI ticket fetcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one task (or a multi-line batch) with the Eisenhower matrix.
    Classify(ClassifyArgs),
    /// List open tickets from the configured GLPI instance.
    Tickets(TicketsArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Classify(args) => {
            let context = build_context()?;
            if context.config.openai_api_key.is_none() {
                eprintln!("Warning: OpenAI API key not configured; classification will fail.");
            }
            classify::run(&context, args).await
        }
        Commands::Tickets(args) => {
            let context = build_context()?;
            if context.config.glpi_base_url.is_none() {
                eprintln!("Warning: GLPI base URL not configured; ticket fetch will fail.");
            }
            if context.config.glpi_app_token.is_none() || context.config.glpi_user_token.is_none()
            {
                eprintln!("Warning: GLPI tokens not configured; ticket fetch will fail.");
            }
            tickets::run(&context, args).await
        }
    }
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    let classifier: Arc<dyn ClassifierService> = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let tickets: Arc<dyn TicketService> = Arc::new(GlpiClient::new(
        config.glpi_base_url.clone(),
        config.glpi_app_token.clone(),
        config.glpi_user_token.clone(),
    ));

    Ok(AppContext::new(config, classifier, tickets))
}
