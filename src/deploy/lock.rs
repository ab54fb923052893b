// ABOUTME: Lock on the steamcmd config directory to prevent concurrent publishes.
// ABOUTME: Lock info is written to a temp file and hard-linked into depotpush.lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;

use crate::types::AppId;

use super::DeployError;

pub const LOCK_FILENAME: &str = "depotpush.lock";

/// Age after which a lock is assumed abandoned.
pub const DEFAULT_LOCK_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// App being published.
    pub app_id: u32,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(app_id: AppId) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            app_id: app_id.get(),
        }
    }

    /// Check if this lock is at least `stale_after` old.
    pub fn is_stale(&self, stale_after: Duration) -> bool {
        (Utc::now() - self.started_at)
            .to_std()
            .is_ok_and(|age| age >= stale_after)
    }

    /// Path to the lock file inside a config directory.
    pub fn lock_path(config_dir: &Path) -> PathBuf {
        config_dir.join(LOCK_FILENAME)
    }
}

/// A held config directory lock that releases on drop.
#[derive(Debug)]
pub struct DeployLock {
    path: PathBuf,
    released: bool,
}

impl DeployLock {
    /// Acquire the lock for `config_dir`.
    ///
    /// Returns `LockHeld` if another live run holds it. Locks older than
    /// `stale_after` are broken with a warning, as are unparsable lock files
    /// whose mtime is that old; `force` breaks any lock.
    pub async fn acquire(
        config_dir: &Path,
        app_id: AppId,
        force: bool,
        stale_after: Duration,
    ) -> Result<Self, DeployError> {
        tokio::fs::create_dir_all(config_dir)
            .await
            .map_err(|e| DeployError::staging(config_dir, e))?;

        let path = LockInfo::lock_path(config_dir);
        let info = LockInfo::new(app_id);
        let json = serde_json::to_string(&info)
            .map_err(|e| DeployError::Lock(format!("failed to serialize lock: {}", e)))?;

        if Self::try_create(&path, &json).await? {
            return Ok(Self {
                path,
                released: false,
            });
        }

        Self::check_existing_lock(&path, force, stale_after).await?;

        tracing::debug!("Removing stale/forced lock at {}", path.display());
        if let Err(e) = tokio::fs::remove_file(&path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return Err(DeployError::Lock(format!("failed to break lock: {}", e)));
        }

        if !Self::try_create(&path, &json).await? {
            return Err(DeployError::Lock(
                "lock acquired by another process during break".to_string(),
            ));
        }

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock, reporting failure to remove the file.
    pub async fn release(mut self) -> std::io::Result<()> {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Publish the lock only if absent. `Ok(false)` means it already exists.
    ///
    /// The info is fully written to a private temp file first and then
    /// hard-linked into place, so a lock file is never seen half-written.
    async fn try_create(path: &Path, json: &str) -> Result<bool, DeployError> {
        let tmp = temp_path(path);
        let published = match Self::write_temp(&tmp, json).await {
            Ok(()) => match tokio::fs::hard_link(&tmp, path).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
                Err(e) => Err(DeployError::Lock(format!(
                    "failed to create {}: {}",
                    path.display(),
                    e
                ))),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_file(&tmp).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::debug!("failed to remove {}: {}", tmp.display(), e);
        }
        published
    }

    async fn write_temp(tmp: &Path, json: &str) -> Result<(), DeployError> {
        let write_err =
            |e: std::io::Error| DeployError::Lock(format!("failed to write lock info: {}", e));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(tmp)
            .await
            .map_err(write_err)?;
        file.write_all(json.as_bytes()).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)
    }

    /// Decide whether an existing lock may be broken; `LockHeld` if not.
    async fn check_existing_lock(
        path: &Path,
        force: bool,
        stale_after: Duration,
    ) -> Result<(), DeployError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Self::check_unparsable_lock(path, force, stale_after, &e.to_string())
                    .await;
            }
        };

        match serde_json::from_str::<LockInfo>(&content) {
            Ok(existing) if force => {
                tracing::warn!(
                    "Breaking lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                Ok(())
            }
            Ok(existing) if existing.is_stale(stale_after) => {
                tracing::warn!(
                    "Auto-breaking stale lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                Ok(())
            }
            Ok(existing) => Err(DeployError::LockHeld {
                holder: existing.holder,
                pid: existing.pid,
                started_at: existing.started_at,
            }),
            Err(e) => Self::check_unparsable_lock(path, force, stale_after, &e.to_string()).await,
        }
    }

    /// A lock without readable info is only broken when forced or old by mtime.
    async fn check_unparsable_lock(
        path: &Path,
        force: bool,
        stale_after: Duration,
        reason: &str,
    ) -> Result<(), DeployError> {
        if force {
            tracing::warn!("Breaking unreadable lock {} ({})", path.display(), reason);
            return Ok(());
        }

        let age = tokio::fs::metadata(path)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok());
        match age {
            Some(age) if age >= stale_after => {
                tracing::warn!(
                    "Auto-breaking stale unreadable lock {} ({})",
                    path.display(),
                    reason
                );
                Ok(())
            }
            _ => Err(DeployError::Lock(format!(
                "{} exists but is unreadable ({}); use --force to break it",
                path.display(),
                reason
            ))),
        }
    }
}

/// Unique per process and per attempt.
fn temp_path(path: &Path) -> PathBuf {
    static ATTEMPT: AtomicU64 = AtomicU64::new(0);
    let attempt = ATTEMPT.fetch_add(1, Ordering::Relaxed);
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.{}.tmp", std::process::id(), attempt));
    PathBuf::from(name)
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
