use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::context::{read_state_file, Context};
use crate::error::CliError;

/// Create and list backup snapshots
#[derive(Debug, Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    pub command: BackupSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupSubcommand {
    /// Store a backup of a state file
    Create {
        /// JSON file holding the application state
        file: PathBuf,
    },

    /// List the most recent backups, newest first
    List,
}

impl BackupCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let coordinator = ctx.coordinator()?;

        match &self.command {
            BackupSubcommand::Create { file } => {
                let state = read_state_file(file)?;
                let id = coordinator.create_backup(&state).await?;
                println!("Created backup {}", id);
            }
            BackupSubcommand::List => {
                let backups = coordinator.get_backups().await?;
                if backups.is_empty() {
                    println!("No backups found.");
                    return Ok(());
                }
                for backup in backups {
                    println!(
                        "{}  {}  {} books, {} sagas (v{})",
                        backup.created_at.format("%Y-%m-%d %H:%M:%S"),
                        backup.id,
                        backup.book_count,
                        backup.saga_count,
                        backup.version
                    );
                }
            }
        }
        Ok(())
    }
}
