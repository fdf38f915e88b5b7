use std::path::PathBuf;

use shelf_sync_core::{ErrorKind, SyncError};

use crate::config::ConfigError;

/// Errors surfaced by CLI commands
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Sync(SyncError),
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
    Session(String),
    NotConfigured(String),
    Runtime(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Sync(e) => match e.kind() {
                ErrorKind::Unauthenticated => {
                    write!(f, "{} (run 'shelf login' first)", e)
                }
                ErrorKind::DocumentMissing => {
                    write!(f, "{} (run 'shelf snapshot save' first)", e)
                }
                ErrorKind::StoreUnavailable | ErrorKind::ValidationFailure => {
                    write!(f, "{}", e)
                }
            },
            CliError::Io(path, e) => write!(f, "I/O error on '{}': {}", path.display(), e),
            CliError::Json(path, e) => write!(f, "Invalid JSON in '{}': {}", path.display(), e),
            CliError::Session(e) => write!(f, "Session error: {}", e),
            CliError::NotConfigured(e) => write!(f, "Not configured: {}", e),
            CliError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        CliError::Sync(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_hint() {
        let err = CliError::from(SyncError::Unauthenticated);
        assert_eq!(err.to_string(), "Not signed in (run 'shelf login' first)");
    }

    #[test]
    fn test_store_error_passthrough() {
        let err = CliError::from(SyncError::StoreUnavailable("down".into()));
        assert_eq!(err.to_string(), "Store unavailable: down");
    }
}
