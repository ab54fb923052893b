// ABOUTME: Deploy orchestration: credential staging, steamcmd login and upload.
// ABOUTME: Exports the Deployer, its error types, log collection, and the config directory lock.

mod credentials;
mod error;
mod lock;
mod logs;
mod orchestrator;

pub use credentials::{
    CredentialBundle, StagedCredentials, stage_credentials, validate_sentry_file_name,
};
pub use error::{DeployError, DeployErrorKind, LockHolderInfo};
pub use lock::{DEFAULT_LOCK_STALE_AFTER, DeployLock, LOCK_FILENAME, LockInfo};
pub use logs::{CollectedLog, collect_logs};
pub use orchestrator::{DeployOptions, DeployResult, Deployer};
