// ABOUTME: Credential bundle and staging into the steamcmd config directory.
// ABOUTME: Writes config/config.vdf and the sentry file verbatim.

use super::DeployError;
use crate::platform::ToolLocation;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Login secrets and opaque session files for steamcmd.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub username: String,
    pub password: String,
    /// Contents of `config/config.vdf`.
    pub session_config: Vec<u8>,
    pub sentry_file_name: String,
    pub sentry_file: Vec<u8>,
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("username", &self.username)
            .field("password", &"***")
            .field("session_config", &format_args!("{} bytes", self.session_config.len()))
            .field("sentry_file_name", &self.sentry_file_name)
            .field("sentry_file", &format_args!("{} bytes", self.sentry_file.len()))
            .finish()
    }
}

/// Paths written by [`stage_credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCredentials {
    pub session_config: PathBuf,
    pub sentry_file: PathBuf,
}

/// The sentry file must land directly inside the config directory.
pub fn validate_sentry_file_name(name: &str) -> Result<(), DeployError> {
    let mut components = Path::new(name).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\']);

    if valid {
        Ok(())
    } else {
        Err(DeployError::InvalidSentryFileName(name.to_string()))
    }
}

/// Write the session config and sentry file into the tool's config directory.
///
/// Creates `<config_dir>/config` if needed. Existing files are overwritten.
pub async fn stage_credentials(
    location: &ToolLocation,
    credentials: &CredentialBundle,
) -> Result<StagedCredentials, DeployError> {
    validate_sentry_file_name(&credentials.sentry_file_name)?;

    let session_config = location.session_config_path();
    if let Some(parent) = session_config.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DeployError::staging(parent, e))?;
    }
    tokio::fs::write(&session_config, &credentials.session_config)
        .await
        .map_err(|e| DeployError::staging(&session_config, e))?;

    let sentry_file = location.config_dir.join(&credentials.sentry_file_name);
    tokio::fs::write(&sentry_file, &credentials.sentry_file)
        .await
        .map_err(|e| DeployError::staging(&sentry_file, e))?;

    tracing::info!(
        "Staged credentials in {} ({} and {})",
        location.config_dir.display(),
        session_config.display(),
        sentry_file.display()
    );

    Ok(StagedCredentials {
        session_config,
        sentry_file,
    })
}
