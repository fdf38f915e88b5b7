//! Commands that move the whole state through the per-domain documents.

use std::path::PathBuf;

use clap::Args;
use shelf_sync_core::{check_server, IdentityProvider, LegacyStore, SaveOutcome};

use crate::config::StoreBackend;
use crate::context::{read_state_file, write_state, Context};
use crate::error::CliError;

/// Save a state file to the store
#[derive(Debug, Args)]
pub struct PushCommand {
    /// JSON file holding the application state
    pub file: PathBuf,
}

impl PushCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let state = read_state_file(&self.file)?;
        let coordinator = ctx.coordinator()?;

        match coordinator.save_all_data(&state).await? {
            SaveOutcome::Saved => println!(
                "Saved {} books and {} sagas for {}",
                state.books.len(),
                state.series.len(),
                coordinator.principal()
            ),
            SaveOutcome::Skipped => println!("Another save is in progress; nothing written."),
        }
        Ok(())
    }
}

/// Load the state from the store
#[derive(Debug, Args)]
pub struct PullCommand {
    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

impl PullCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let state = ctx.coordinator()?.load_all_data().await?;
        write_state(&state, self.out.as_deref())
    }
}

/// Import an export of the legacy local store
#[derive(Debug, Args)]
pub struct MigrateCommand {
    /// JSON export of the legacy key-value store
    pub file: PathBuf,
}

impl MigrateCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let legacy = LegacyStore::load(&self.file).await?;
        if legacy.is_empty() {
            println!("Nothing to migrate in {}", self.file.display());
            return Ok(());
        }

        let state = legacy.to_state()?;
        let coordinator = ctx.coordinator()?;
        if coordinator.has_data().await? {
            println!("Existing data will be overwritten.");
        }

        match coordinator.migrate_from_local_storage(&state).await? {
            SaveOutcome::Saved => println!(
                "Migrated {} books and {} sagas.",
                state.books.len(),
                state.series.len()
            ),
            SaveOutcome::Skipped => println!("Another save is in progress; nothing migrated."),
        }
        Ok(())
    }
}

/// Shows store and session status.
pub async fn status(ctx: &Context) -> Result<(), CliError> {
    println!("Store Status");
    println!("============");
    println!();

    println!("Backend: {}", ctx.config.store.backend);
    match ctx.config.store.backend {
        StoreBackend::Http => {
            let url = ctx.config.store.server_url.as_deref().unwrap_or("(not set)");
            println!("Server:  {}", url);
            print!("Server status: ");
            if check_server(url).await {
                println!("✓ reachable");
            } else {
                println!("✗ unreachable");
            }
        }
        StoreBackend::File => println!("Path:    {}", ctx.config.store_dir().display()),
        StoreBackend::Memory => println!("(nothing persists between commands)"),
    }
    println!();

    let Some(principal) = ctx.session.current_principal() else {
        println!("Session: signed out");
        return Ok(());
    };
    println!("Session: {}", principal.id);

    let has_snapshot = ctx.state_store()?.has_user_data().await;
    println!(
        "  snapshot (appState): {}",
        if has_snapshot { "present" } else { "none" }
    );

    match ctx.coordinator()?.has_data().await {
        Ok(true) => println!("  library: has books"),
        Ok(false) => println!("  library: empty"),
        Err(e) => println!("  library: ✗ {}", e),
    }
    Ok(())
}
