// ABOUTME: Error types for credential staging and steamcmd invocation.
// ABOUTME: Covers login and upload failures, staging I/O, and config directory locking.

use super::logs::CollectedLog;
use crate::process::ProcessExit;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Errors that can occur while deploying a generated manifest.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Pre-flight login exited non-zero; the upload was not attempted.
    #[error("steamcmd login failed ({exit}); check username, password and sentry files")]
    AuthenticationFailed { exit: ProcessExit },

    /// The upload invocation exited non-zero.
    #[error("steamcmd upload failed ({exit})")]
    UploadFailed {
        exit: ProcessExit,
        logs: Vec<CollectedLog>,
    },

    /// Writing credential files failed.
    #[error("failed to stage {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },

    /// steamcmd could not be started.
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// Sentry file name would escape the config directory.
    #[error("invalid sentry file name {0:?}: must be a plain file name")]
    InvalidSentryFileName(String),

    /// Another run holds the config directory lock.
    #[error("steam config directory is locked by {holder} (pid {pid}) since {started_at}; use --force to break it")]
    LockHeld {
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    /// Lock file could not be created or inspected.
    #[error("lock error: {0}")]
    Lock(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    AuthenticationFailed,
    UploadFailed,
    Staging,
    Spawn,
    InvalidInput,
    LockHeld,
    Lock,
}

/// Holder of a contended lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolderInfo {
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::AuthenticationFailed { .. } => DeployErrorKind::AuthenticationFailed,
            DeployError::UploadFailed { .. } => DeployErrorKind::UploadFailed,
            DeployError::Staging { .. } => DeployErrorKind::Staging,
            DeployError::Spawn { .. } => DeployErrorKind::Spawn,
            DeployError::InvalidSentryFileName(_) => DeployErrorKind::InvalidInput,
            DeployError::LockHeld { .. } => DeployErrorKind::LockHeld,
            DeployError::Lock(_) => DeployErrorKind::Lock,
        }
    }

    /// Tool logs collected after a failed upload.
    pub fn logs(&self) -> &[CollectedLog] {
        match self {
            DeployError::UploadFailed { logs, .. } => logs,
            _ => &[],
        }
    }

    pub fn lock_holder_info(&self) -> Option<LockHolderInfo> {
        match self {
            DeployError::LockHeld {
                holder,
                pid,
                started_at,
            } => Some(LockHolderInfo {
                holder: holder.clone(),
                pid: *pid,
                started_at: *started_at,
            }),
            _ => None,
        }
    }

    pub(crate) fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Staging {
            path: path.into(),
            source,
        }
    }
}
