//! Commands for the consolidated `appState` document.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::context::{read_state_file, write_state, Context};
use crate::error::CliError;

/// Manage the consolidated state snapshot
#[derive(Debug, Args)]
pub struct SnapshotCommand {
    #[command(subcommand)]
    pub command: SnapshotSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotSubcommand {
    /// Overwrite the snapshot with a state file
    Save {
        /// JSON file holding the application state
        file: PathBuf,
    },

    /// Print (or write) the stored snapshot
    Load {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Replace only the books of an existing snapshot
    Books {
        /// JSON file holding the application state; only its books are used
        file: PathBuf,
    },
}

impl SnapshotCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let states = ctx.state_store()?;

        match &self.command {
            SnapshotSubcommand::Save { file } => {
                let state = read_state_file(file)?;
                states.save_app_state(&state).await?;
                println!("Saved snapshot with {} books.", state.books.len());
            }
            SnapshotSubcommand::Load { out } => match states.load_app_state().await? {
                Some(state) => write_state(&state, out.as_deref())?,
                None => println!("No snapshot stored. Run 'shelf snapshot save' first."),
            },
            SnapshotSubcommand::Books { file } => {
                let state = read_state_file(file)?;
                states.save_books(&state.books).await?;
                println!("Updated snapshot books ({}).", state.books.len());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::test_context;
    use shelf_sync_core::{ApplicationState, Book, ErrorKind};
    use tempfile::TempDir;

    fn state_file(dir: &TempDir, name: &str, books: Vec<Book>) -> PathBuf {
        let path = dir.path().join(name);
        write_state(&ApplicationState::new().with_books(books), Some(&path)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_books_before_save_is_document_missing() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, Some("fresh"));
        let file = state_file(&dir, "s.json", vec![Book::new(1, "Dune")]);

        let err = SnapshotCommand {
            command: SnapshotSubcommand::Books { file },
        }
        .run(&ctx)
        .await
        .unwrap_err();

        match err {
            CliError::Sync(e) => assert_eq!(e.kind(), ErrorKind::DocumentMissing),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_save_books_load() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, Some("reader"));
        let first = state_file(&dir, "a.json", vec![Book::new(1, "Dune")]);
        let second = state_file(&dir, "b.json", vec![Book::new(2, "Emma")]);

        SnapshotCommand {
            command: SnapshotSubcommand::Save { file: first },
        }
        .run(&ctx)
        .await
        .unwrap();
        SnapshotCommand {
            command: SnapshotSubcommand::Books { file: second },
        }
        .run(&ctx)
        .await
        .unwrap();

        let out = dir.path().join("out.json");
        SnapshotCommand {
            command: SnapshotSubcommand::Load {
                out: Some(out.clone()),
            },
        }
        .run(&ctx)
        .await
        .unwrap();

        let loaded = read_state_file(&out).unwrap();
        assert_eq!(loaded.books, vec![Book::new(2, "Emma")]);
    }
}
