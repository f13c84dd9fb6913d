//! # trendline CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trendline_client::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use trendline_client::{ClientConfig, TrendlineClient};

use trendline_cli::commands::{
    run_create, run_link, run_log, run_show, run_update, CreateArgs, LinkArgs, LogArgs, ShowArgs,
    UpdateArgs,
};

/// Trendline CLI: burndown tracking for fixed-scope projects.
#[derive(Parser, Debug)]
#[command(name = "trendline", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the Trendline server.
    #[arg(long, env = "TRENDLINE_URL", default_value = DEFAULT_URL, global = true)]
    server: String,

    /// Request timeout in seconds.
    #[arg(long, env = "TRENDLINE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a project (overwrites an existing one unless --no-overwrite).
    Create(CreateArgs),
    /// Show stats, the burndown table, and progress history.
    Show(ShowArgs),
    /// Record tasks completed on a day.
    Log(LogArgs),
    /// Change a project's name or dates.
    Update(UpdateArgs),
    /// Print the shareable link for a project.
    Link(LinkArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let mut config = ClientConfig::new(&cli.server)?;
    config.timeout_secs = cli.timeout;
    tracing::debug!(server = %config.base_url, "using server");
    let client = TrendlineClient::new(config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut stdout = std::io::stdout().lock();

    runtime.block_on(async {
        match &cli.command {
            Commands::Create(args) => run_create(&client, args, &mut stdout).await,
            Commands::Show(args) => run_show(&client, args, &mut stdout).await,
            Commands::Log(args) => run_log(&client, args, &mut stdout).await,
            Commands::Update(args) => run_update(&client, args, &mut stdout).await,
            Commands::Link(args) => run_link(&client, args, &mut stdout),
        }
    })
}
