// ABOUTME: Persists a generated manifest and its depot configs to the workspace.
// ABOUTME: Writes depot<id>.vdf per depot, then manifest.vdf.

use super::BuildManifest;
use crate::types::DepotId;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILENAME: &str = "manifest.vdf";

pub fn depot_filename(depot_id: DepotId) -> String {
    format!("depot{depot_id}.vdf")
}

/// Files written for one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestArtifact {
    pub manifest_path: PathBuf,
    pub depot_paths: Vec<PathBuf>,
}

/// Write all depot configs and the manifest into `workspace`.
///
/// The manifest is written last so its presence implies its depot files exist.
pub async fn write_manifest(
    manifest: &BuildManifest,
    workspace: &Path,
) -> std::io::Result<ManifestArtifact> {
    let mut depot_paths = Vec::with_capacity(manifest.depots.len());
    for depot in manifest.depots.iter() {
        let path = workspace.join(depot.filename());
        let text = depot.render();
        tokio::fs::write(&path, &text).await?;
        tracing::debug!("Wrote {}", path.display());
        depot_paths.push(path);
    }

    let manifest_path = workspace.join(MANIFEST_FILENAME);
    let text = manifest.render();
    tokio::fs::write(&manifest_path, &text).await?;
    tracing::debug!("Wrote {}", manifest_path.display());

    Ok(ManifestArtifact {
        manifest_path,
        depot_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::manifest::{ManifestRequest, default_exclusions, generate};
    use crate::types::{AppId, DepotSlot, DepotSlots};

    #[tokio::test]
    async fn writes_one_file_per_depot_plus_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let slots = DepotSlots::new()
            .with(DepotSlot::new(1).unwrap(), "linux")
            .with(DepotSlot::new(2).unwrap(), "windows");
        let exclusions = default_exclusions();
        let request = ManifestRequest {
            app_id: AppId::new(1000),
            content_root: "out",
            description: None,
            release_branch: None,
            slots: &slots,
            exclusions: &exclusions,
        };
        let manifest = generate(&request, None, &mut Diagnostics::default()).unwrap();

        let artifact = write_manifest(&manifest, dir.path()).await.unwrap();

        assert_eq!(artifact.manifest_path, dir.path().join("manifest.vdf"));
        assert_eq!(
            artifact.depot_paths,
            vec![
                dir.path().join("depot1001.vdf"),
                dir.path().join("depot1002.vdf")
            ]
        );
        let written = std::fs::read_to_string(&artifact.manifest_path).unwrap();
        assert_eq!(written, manifest.render());
        let depot = std::fs::read_to_string(dir.path().join("depot1002.vdf")).unwrap();
        assert!(depot.contains("\"LocalPath\" \"./windows/*\""));
    }

    #[tokio::test]
    async fn missing_workspace_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let slots = DepotSlots::new().with(DepotSlot::new(1).unwrap(), "linux");
        let exclusions = default_exclusions();
        let request = ManifestRequest {
            app_id: AppId::new(1000),
            content_root: ".",
            description: None,
            release_branch: None,
            slots: &slots,
            exclusions: &exclusions,
        };
        let manifest = generate(&request, None, &mut Diagnostics::default()).unwrap();

        let result = write_manifest(&manifest, &dir.path().join("nope")).await;
        assert!(result.is_err());
    }
}
