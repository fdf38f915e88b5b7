mod auth;
mod backup_cmd;
mod config_cmd;
mod snapshot;
mod sync_cmd;

pub use auth::{logout, whoami, LoginCommand};
pub use backup_cmd::BackupCommand;
pub use config_cmd::ConfigCommand;
pub use snapshot::SnapshotCommand;
pub use sync_cmd::{status, MigrateCommand, PullCommand, PushCommand};
