// ABOUTME: Deploy command implementation.
// ABOUTME: Locates steamcmd, generates manifests, stages credentials and uploads under a lock.

use super::generate::generate_manifest;
use super::report_warnings;
use depotpush::action::ActionOutputs;
use depotpush::config::Config;
use depotpush::deploy::{CollectedLog, DeployLock, DeployOptions, Deployer};
use depotpush::diagnostics::{Diagnostics, Warning};
use depotpush::error::Result;
use depotpush::output::Output;
use depotpush::platform::{Platform, SearchEnv, locator_for};
use depotpush::process::TokioRunner;
use std::path::Path;

/// Command-line switches for `deploy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployFlags {
    pub force: bool,
    pub skip_preflight: bool,
}

/// Generate manifests and publish them with steamcmd.
pub async fn deploy(
    config: Config,
    workspace: &Path,
    flags: DeployFlags,
    actions: &ActionOutputs,
    mut output: Output,
) -> Result<()> {
    // Unsupported platforms fail before anything is written.
    let platform = Platform::current()?;
    output.start_timer();

    let locator = locator_for(platform, SearchEnv::from_process());
    let location = locator.locate(config.steam_dir.as_deref())?;
    output.progress(&format!(
        "Using {} on {} (config in {})",
        location.executable.display(),
        locator.platform(),
        location.config_dir.display()
    ));

    let app_id = config.app_id()?;
    let credentials = config.credentials.resolve()?;
    actions.mask(&credentials.password);

    let mut diag = Diagnostics::default();
    let artifact = generate_manifest(&config, workspace, actions, &output, &mut diag).await?;

    let lock = DeployLock::acquire(
        &location.config_dir,
        app_id,
        flags.force,
        config.lock_stale_after,
    )
    .await?;
    tracing::debug!("Holding {}", lock.path().display());

    let options = DeployOptions {
        preflight: config.preflight && !flags.skip_preflight,
        upload_failure: config.on_upload_failure,
    };
    let runner = TokioRunner;
    let deployer = Deployer::new(&runner, &location, workspace, options);

    output.progress("  → Uploading build...");
    let result = deployer.deploy(&artifact, &credentials, &mut diag).await;

    if let Err(e) = lock.release().await {
        diag.warn(Warning::lock_release(format!(
            "failed to remove lock in {}: {}",
            location.config_dir.display(),
            e
        )));
    }

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            print_logs(e.logs(), actions, &output);
            report_warnings(&diag, &output);
            return Err(e.into());
        }
    };

    print_logs(&result.collected_logs, actions, &output);

    let manifest_path = artifact.manifest_path.to_string_lossy();
    actions.set_output("manifest", &manifest_path)?;

    report_warnings(&diag, &output);
    if result.succeeded() {
        output.success(&format!("Published app {app_id} from {manifest_path}"));
    } else {
        output.success(&format!("Upload finished with {} (tolerated)", result.exit));
    }
    Ok(())
}

fn print_logs(logs: &[CollectedLog], actions: &ActionOutputs, output: &Output) {
    for log in logs {
        actions.group(&log.name);
        output.log_file(&log.name, &log.contents);
        actions.end_group();
    }
}

