//! Everything a command needs: configuration, the configured store, and the
//! signed-in session.

use std::path::Path;
use std::sync::Arc;

use shelf_sync_core::{
    current_principal_id, AppStateStore, ApplicationState, CoordinatorRegistry, DocumentStore,
    FileStore, HttpStore, MemoryStore, PrincipalId, Session, SyncCoordinator,
};

use crate::config::{Config, StoreBackend, StoreConfig};
use crate::error::CliError;
use crate::session::SessionFile;

pub struct Context {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub session_file: SessionFile,
    pub session: Session,
    registry: CoordinatorRegistry,
}

impl Context {
    pub fn new(config: Config) -> Result<Self, CliError> {
        let store = open_store(&config)?;
        let session_file = SessionFile::new(config.session_path());
        let session = session_file.to_session()?;

        Ok(Self {
            registry: CoordinatorRegistry::new(store.clone()),
            config,
            store,
            session_file,
            session,
        })
    }

    /// The signed-in principal, or `Unauthenticated`.
    pub fn principal_id(&self) -> Result<PrincipalId, CliError> {
        Ok(current_principal_id(&self.session)?)
    }

    pub fn coordinator(&self) -> Result<Arc<SyncCoordinator>, CliError> {
        Ok(self.registry.coordinator_for(&self.principal_id()?))
    }

    pub fn state_store(&self) -> Result<AppStateStore, CliError> {
        Ok(AppStateStore::new(self.store.clone(), self.principal_id()?))
    }

    /// Forgets every coordinator, as on sign-out.
    pub fn reset(&self) {
        self.registry.clear();
    }

    /// HTTP client for the configured server, when the backend is remote.
    pub fn http_store(&self) -> Result<Option<HttpStore>, CliError> {
        if self.config.store.backend != StoreBackend::Http {
            return Ok(None);
        }
        Ok(Some(http_store(&self.config.store)?))
    }
}

/// Opens the store selected by the configuration.
pub fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>, CliError> {
    Ok(match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; nothing will be kept after this command");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::File => Arc::new(FileStore::new(config.store_dir())),
        StoreBackend::Http => Arc::new(http_store(&config.store)?),
    })
}

fn http_store(store: &StoreConfig) -> Result<HttpStore, CliError> {
    match (&store.server_url, &store.api_key) {
        (Some(url), Some(key)) => Ok(HttpStore::new(url.clone(), key.clone())?),
        _ => Err(CliError::NotConfigured(
            "the http backend needs store.server_url and store.api_key (or SHELF_STORE_URL and SHELF_API_KEY)"
                .to_string(),
        )),
    }
}

/// Reads an `ApplicationState` from a JSON file.
pub fn read_state_file(path: &Path) -> Result<ApplicationState, CliError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CliError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&contents).map_err(|e| CliError::Json(path.to_path_buf(), e))
}

/// Writes `state` as pretty JSON to `out`, or to stdout.
pub fn write_state(state: &ApplicationState, out: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| CliError::Runtime(format!("cannot encode state: {}", e)))?;
    match out {
        Some(path) => {
            std::fs::write(path, json).map_err(|e| CliError::Io(path.to_path_buf(), e))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue};
    use crate::session::SessionRecord;
    use chrono::Utc;
    use shelf_sync_core::Book;
    use tempfile::TempDir;

    /// A file-backed context rooted in a temp dir, optionally signed in.
    pub(crate) fn test_context(dir: &TempDir, principal: Option<&str>) -> Context {
        let config = Config {
            data_dir: ConfigValue::new(dir.path().to_path_buf(), ConfigSource::File),
            config_file: None,
            store: StoreConfig::default(),
        };
        if let Some(id) = principal {
            SessionFile::new(config.session_path())
                .save(&SessionRecord {
                    principal_id: PrincipalId::new(id).unwrap(),
                    email: format!("{}@example.com", id),
                    signed_in_at: Utc::now(),
                })
                .unwrap();
        }
        Context::new(config).unwrap()
    }

    #[test]
    fn test_signed_out_context() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, None);
        let err = ctx.principal_id().unwrap_err();
        assert!(err.to_string().contains("shelf login"));
    }

    #[test]
    fn test_http_backend_requires_credentials() {
        let dir = TempDir::new().unwrap();
        let mut config = test_context(&dir, None).config;
        config.store.backend = StoreBackend::Http;

        assert!(matches!(
            open_store(&config),
            Err(CliError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_state_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let state = ApplicationState::new().with_books(vec![Book::new(1, "Dune")]);

        write_state(&state, Some(&path)).unwrap();
        assert_eq!(read_state_file(&path).unwrap(), state);
    }

    #[test]
    fn test_state_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_state_file(&missing), Err(CliError::Io(..))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(read_state_file(&bad), Err(CliError::Json(..))));
    }
}
