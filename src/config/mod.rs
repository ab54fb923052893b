// ABOUTME: Configuration types and parsing for depotpush.yml.
// ABOUTME: Handles YAML parsing, env var references for secrets, and manifest inputs.

mod credentials;
mod env_value;
mod init;
mod upload_policy;

pub use credentials::CredentialsConfig;
pub use env_value::EnvValue;
pub use init::init_config;
pub use upload_policy::UploadFailurePolicy;

use crate::deploy::DEFAULT_LOCK_STALE_AFTER;
use crate::error::{Error, Result};
use crate::manifest::{ManifestRequest, default_exclusions};
use crate::types::{AppId, DepotSlots};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "depotpush.yml";
pub const CONFIG_FILENAME_ALT: &str = "depotpush.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".depotpush/config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app_id: Option<AppId>,

    /// Content root, relative to the workspace.
    #[serde(default = "default_root_path")]
    pub root_path: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Branch to set the build live on.
    #[serde(default)]
    pub release_branch: Option<String>,

    #[serde(default)]
    pub depots: DepotSlots,

    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<String>,

    /// Skip depots whose content path does not exist.
    #[serde(default = "default_true")]
    pub check_paths: bool,

    /// steamcmd install and state directory.
    #[serde(default)]
    pub steam_dir: Option<PathBuf>,

    /// Log in once before uploading to fail fast on bad credentials.
    #[serde(default = "default_true")]
    pub preflight: bool,

    #[serde(default)]
    pub on_upload_failure: UploadFailurePolicy,

    /// Age after which another run's config directory lock is broken.
    /// Raise it when uploads take longer than the default hour.
    #[serde(default = "default_lock_stale_after", with = "humantime_serde")]
    pub lock_stale_after: Duration,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

fn default_root_path() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_lock_stale_after() -> Duration {
    DEFAULT_LOCK_STALE_AFTER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: None,
            root_path: default_root_path(),
            description: None,
            release_branch: None,
            depots: DepotSlots::default(),
            exclusions: default_exclusions(),
            check_paths: true,
            steam_dir: None,
            preflight: true,
            on_upload_failure: UploadFailurePolicy::default(),
            lock_stale_after: default_lock_stale_after(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// First config file present in `dir`, if any.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the config file from `dir` if there is one.
    ///
    /// A missing file is not an error: every setting can also come from
    /// action inputs.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        Self::find(dir).map(|path| Self::load(&path)).transpose()
    }

    /// Load an explicitly named config file.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        Self::load(path)
    }

    pub fn app_id(&self) -> Result<AppId> {
        self.app_id
            .ok_or_else(|| Error::MissingInput("appId".to_string()))
    }

    /// Manifest generation inputs derived from this config.
    pub fn manifest_request(&self) -> Result<ManifestRequest<'_>> {
        Ok(ManifestRequest {
            app_id: self.app_id()?,
            content_root: self.root_path.trim(),
            description: non_empty(self.description.as_deref()),
            release_branch: non_empty(self.release_branch.as_deref()),
            slots: &self.depots,
            exclusions: &self.exclusions,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
