//! gpush - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gpush::commands::{self, ConfigArgs};
use gpush::{Config, GpushError, PushRequest, TerminalUi};

/// Generate commit messages for staged changes with AI, then commit and push.
#[derive(Parser, Debug)]
#[command(name = "gpush")]
#[command(about = "AI-powered git commit message generator and push tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate commit message and push changes
    Push {
        /// Show generated message without committing
        #[arg(short, long)]
        dry_run: bool,

        /// Force push changes
        #[arg(short, long)]
        force: bool,

        /// Push to this branch on origin
        #[arg(short, long)]
        branch: Option<String>,

        /// Commit and push without asking for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage configuration
    Config {
        /// Set OpenAI API key
        #[arg(long, value_name = "KEY")]
        set_key: Option<String>,

        /// Show current API key status
        #[arg(long)]
        show_key: bool,

        /// Set AI provider (openai or bedrock)
        #[arg(long)]
        provider: Option<String>,

        /// Set the model for the selected provider
        #[arg(long)]
        model: Option<String>,

        /// Set AWS region for Bedrock
        #[arg(long)]
        region: Option<String>,

        /// Set Bedrock API key
        #[arg(long, value_name = "KEY")]
        set_bedrock_key: Option<String>,
    },

    /// Show current configuration status
    Status,

    /// Set default AI model
    #[command(name = "ai:model")]
    AiModel {
        /// Model name (e.g. gpt-4o, anthropic.claude-3-haiku-20240307-v1:0)
        model: String,
    },

    /// Set AI provider
    #[command(name = "ai:provider")]
    AiProvider {
        /// openai or bedrock
        provider: String,
    },

    /// Set AWS region for Bedrock
    #[command(name = "ai:region")]
    AiRegion {
        /// Region name (e.g. eu-central-1)
        region: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    let ui = TerminalUi::new();
    match run(cli, &ui).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = commands::report_failure(&ui, &e);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "warn,gpush=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to initialize logging")
}

async fn run(cli: Cli, ui: &TerminalUi) -> Result<(), GpushError> {
    let mut config = Config::load()?;
    let workdir = Path::new(".");

    match cli.command {
        None => commands::run_menu(&mut config, ui, workdir).await,
        Some(Command::Push {
            dry_run,
            force,
            branch,
            yes,
        }) => {
            let request = PushRequest {
                dry_run,
                force,
                branch,
                assume_yes: yes,
            };
            commands::push(&mut config, ui, workdir, &request)
                .await
                .map(|_| ())
        }
        Some(Command::Config {
            set_key,
            show_key,
            provider,
            model,
            region,
            set_bedrock_key,
        }) => {
            let args = ConfigArgs {
                set_key,
                show_key,
                provider,
                model,
                region,
                set_bedrock_key,
            };
            commands::configure(&mut config, ui, &args)
        }
        Some(Command::Status) => {
            commands::show_status(&config, ui);
            Ok(())
        }
        Some(Command::AiModel { model }) => commands::set_model(&mut config, ui, &model),
        Some(Command::AiProvider { provider }) => {
            commands::set_provider(&mut config, ui, &provider)
        }
        Some(Command::AiRegion { region }) => commands::set_region(&mut config, ui, &region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_push_flags() {
        let cli = Cli::try_parse_from(["gpush", "push", "-d", "-f", "-b", "main", "-y"]).unwrap();
        match cli.command {
            Some(Command::Push {
                dry_run,
                force,
                branch,
                yes,
            }) => {
                assert!(dry_run && force && yes);
                assert_eq!(branch.as_deref(), Some("main"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_colon_subcommands() {
        let cli = Cli::try_parse_from(["gpush", "ai:model", "gpt-4o"]).unwrap();
        assert!(matches!(cli.command, Some(Command::AiModel { model }) if model == "gpt-4o"));

        let cli = Cli::try_parse_from(["gpush", "ai:region", "us-east-1"]).unwrap();
        assert!(matches!(cli.command, Some(Command::AiRegion { region }) if region == "us-east-1"));
    }

    #[test]
    fn test_no_subcommand_opens_menu() {
        let cli = Cli::try_parse_from(["gpush", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
