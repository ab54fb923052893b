// ABOUTME: Generate command implementation.
// ABOUTME: Writes manifest.vdf and depot configs and records the manifest output.

use super::report_warnings;
use depotpush::action::ActionOutputs;
use depotpush::config::Config;
use depotpush::diagnostics::Diagnostics;
use depotpush::error::Result;
use depotpush::manifest::{self, ManifestArtifact, write_manifest};
use depotpush::output::Output;
use std::path::Path;

/// Generate and write the manifest files for `config` into `workspace`.
pub(super) async fn generate_manifest(
    config: &Config,
    workspace: &Path,
    actions: &ActionOutputs,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<ManifestArtifact> {
    let request = config.manifest_request()?;
    output.progress(&format!(
        "Generating depot manifests for app {}",
        request.app_id
    ));

    let exists = |path: &Path| workspace.join(path).exists();
    let check = config
        .check_paths
        .then_some(&exists as &dyn Fn(&Path) -> bool);

    let manifest = manifest::generate(&request, check, diag)?;
    let artifact = write_manifest(&manifest, workspace).await?;

    for depot in manifest.depots.iter() {
        output.progress(&format!(
            "  → depot {} ← {}/{}",
            depot.depot_id, manifest.content_root, depot.local_path
        ));
    }
    for (depot, path) in manifest.depots.iter().zip(&artifact.depot_paths) {
        show_file(path, &depot.render(), actions, output);
    }
    show_file(&artifact.manifest_path, &manifest.render(), actions, output);

    Ok(artifact)
}

fn show_file(path: &Path, contents: &str, actions: &ActionOutputs, output: &Output) {
    let name = path.display().to_string();
    actions.group(&name);
    output.generated_file(&name, contents);
    actions.end_group();
}

/// Generate manifests only.
pub async fn generate(
    config: Config,
    workspace: &Path,
    actions: &ActionOutputs,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let artifact = generate_manifest(&config, workspace, actions, &output, &mut diag).await?;
    let manifest_path = artifact.manifest_path.to_string_lossy();
    actions.set_output("manifest", &manifest_path)?;

    report_warnings(&diag, &output);
    output.success(&format!("Manifest written to {manifest_path}"));
    Ok(())
}
