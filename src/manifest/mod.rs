// ABOUTME: Build manifest and depot config generation for steamcmd app builds.
// ABOUTME: Maps configured depot slots to depot IDs and renders the text files.

mod vdf;
mod write;

pub use write::{MANIFEST_FILENAME, ManifestArtifact, depot_filename, write_manifest};

use crate::diagnostics::{Diagnostics, Warning};
use crate::types::{AppId, DepotId, DepotSlots};
use nonempty::NonEmpty;
use std::path::Path;
use vdf::{VdfWriter, check_value};

/// Build output directory steamcmd writes its own bookkeeping into.
pub const BUILD_OUTPUT_DIR: &str = "BuildOutput";

/// Files excluded from every depot unless configured otherwise.
pub const DEFAULT_EXCLUSIONS: [&str; 3] = [
    "*.pdb",
    "**/*_BurstDebugInformation_DoNotShip*",
    "**/*_BackUpThisFolder_ButDontShipItWithYourGame*",
];

pub fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

/// Errors produced while building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Every slot was empty or skipped.
    #[error("no depots to upload: configure at least one depot path that exists")]
    NoDepots,

    /// `app_id + slot` does not fit in a depot ID.
    #[error("depot ID for app {app_id} slot {slot} overflows")]
    DepotIdOverflow { app_id: AppId, slot: u8 },

    /// Value contains characters the text format cannot carry.
    #[error("value for '{key}' cannot contain quotes or line breaks: {value:?}")]
    UnrepresentableValue { key: &'static str, value: String },
}

/// Inputs to manifest generation.
#[derive(Debug, Clone)]
pub struct ManifestRequest<'a> {
    pub app_id: AppId,
    pub content_root: &'a str,
    pub description: Option<&'a str>,
    pub release_branch: Option<&'a str>,
    pub slots: &'a DepotSlots,
    pub exclusions: &'a [String],
}

/// One depot's file mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepotSpec {
    pub depot_id: DepotId,
    /// Content path relative to the content root.
    pub local_path: String,
    pub depot_path: String,
    pub recursive: bool,
    pub exclusions: Vec<String>,
}

impl DepotSpec {
    /// Name of the config file this depot is written to.
    pub fn filename(&self) -> String {
        depot_filename(self.depot_id)
    }

    pub fn render(&self) -> String {
        let mut w = VdfWriter::new();
        w.open("DepotBuildConfig")
            .pair("DepotID", self.depot_id)
            .open("FileMapping")
            .pair("LocalPath", format!("./{}/*", self.local_path))
            .pair("DepotPath", &self.depot_path)
            .pair("recursive", if self.recursive { "1" } else { "0" })
            .close();
        for pattern in &self.exclusions {
            w.pair("FileExclusion", pattern);
        }
        w.close();
        w.finish()
    }
}

/// Top-level app build description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildManifest {
    pub app_id: AppId,
    pub description: Option<String>,
    pub build_output: String,
    pub content_root: String,
    pub release_branch: Option<String>,
    /// Depots in ascending slot order.
    pub depots: NonEmpty<DepotSpec>,
}

impl BuildManifest {
    pub fn depot_ids(&self) -> Vec<DepotId> {
        self.depots.iter().map(|d| d.depot_id).collect()
    }

    pub fn render(&self) -> String {
        let mut w = VdfWriter::new();
        w.open("appbuild")
            .pair("appid", self.app_id)
            .pair_opt("desc", self.description.as_deref())
            .pair("buildoutput", &self.build_output)
            .pair("contentroot", &self.content_root)
            .pair_opt("setlive", self.release_branch.as_deref())
            .open("depots");
        for depot in self.depots.iter() {
            w.pair(&depot.depot_id.to_string(), depot.filename());
        }
        w.close().close();
        w.finish()
    }
}

/// Build the manifest for the configured depot slots.
///
/// Slot N becomes depot `app_id + N`. When `existence_check` is given, a slot
/// whose `content_root/path` fails the check is skipped with a warning.
pub fn generate(
    request: &ManifestRequest<'_>,
    existence_check: Option<&dyn Fn(&Path) -> bool>,
    diag: &mut Diagnostics,
) -> Result<BuildManifest, GenerationError> {
    check_value("contentroot", request.content_root)?;
    if let Some(desc) = request.description {
        check_value("desc", desc)?;
    }
    if let Some(branch) = request.release_branch {
        check_value("setlive", branch)?;
    }
    for pattern in request.exclusions {
        check_value("FileExclusion", pattern)?;
    }

    let mut depots = Vec::new();
    for (slot, path) in request.slots.iter() {
        let depot_id = request
            .app_id
            .depot(slot)
            .ok_or(GenerationError::DepotIdOverflow {
                app_id: request.app_id,
                slot: slot.index(),
            })?;
        check_value("LocalPath", path)?;

        if let Some(exists) = existence_check {
            let resolved = Path::new(request.content_root).join(path);
            if !exists(&resolved) {
                diag.warn(Warning::depot_skipped(format!(
                    "skipping depot {depot_id} (slot {slot}): {} does not exist",
                    resolved.display()
                )));
                continue;
            }
        }

        tracing::debug!(%depot_id, %slot, path, "adding depot");
        depots.push(DepotSpec {
            depot_id,
            local_path: path.to_string(),
            depot_path: ".".to_string(),
            recursive: true,
            exclusions: request.exclusions.to_vec(),
        });
    }

    let depots = NonEmpty::from_vec(depots).ok_or(GenerationError::NoDepots)?;

    Ok(BuildManifest {
        app_id: request.app_id,
        description: request.description.map(str::to_string),
        build_output: BUILD_OUTPUT_DIR.to_string(),
        content_root: request.content_root.to_string(),
        release_branch: request.release_branch.map(str::to_string),
        depots,
    })
}
