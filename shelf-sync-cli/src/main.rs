use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod context;
mod error;
mod session;

use commands::{
    BackupCommand, ConfigCommand, LoginCommand, MigrateCommand, PullCommand, PushCommand,
    SnapshotCommand,
};
use config::Config;
use context::Context;
use error::CliError;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version)]
#[command(about = "Sync a personal library with its document store", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a principal
    Login(LoginCommand),

    /// Sign out
    Logout,

    /// Show the signed-in principal
    Whoami,

    /// Save a state file to the per-domain documents
    Push(PushCommand),

    /// Load the state from the per-domain documents
    Pull(PullCommand),

    /// Manage the consolidated snapshot document
    Snapshot(SnapshotCommand),

    /// Create and list backups
    Backup(BackupCommand),

    /// Import an export of the legacy local store
    Migrate(MigrateCommand),

    /// Show store and session status
    Status,

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    // Config does not need a store or a session
    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    let ctx = Context::new(config)?;
    rt.block_on(execute_command(&command, &ctx))
}

async fn execute_command(command: &Commands, ctx: &Context) -> Result<(), CliError> {
    match command {
        Commands::Login(cmd) => cmd.run(ctx).await,
        Commands::Logout => commands::logout(ctx),
        Commands::Whoami => commands::whoami(ctx).await,
        Commands::Push(cmd) => cmd.run(ctx).await,
        Commands::Pull(cmd) => cmd.run(ctx).await,
        Commands::Snapshot(cmd) => cmd.run(ctx).await,
        Commands::Backup(cmd) => cmd.run(ctx).await,
        Commands::Migrate(cmd) => cmd.run(ctx).await,
        Commands::Status => commands::status(ctx).await,
        Commands::Config(cmd) => cmd.run(&ctx.config),
    }
}
