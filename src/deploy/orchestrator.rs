// ABOUTME: Sequences a publish: stage credentials, pre-flight login, upload, collect logs.
// ABOUTME: Drives steamcmd through the ProcessRunner seam so it can be faked in tests.

use super::credentials::{CredentialBundle, stage_credentials};
use super::logs::{CollectedLog, collect_logs};
use super::DeployError;
use crate::config::UploadFailurePolicy;
use crate::diagnostics::{Diagnostics, Warning};
use crate::manifest::ManifestArtifact;
use crate::platform::ToolLocation;
use crate::process::{ProcessExit, ProcessRunner, ToolCommand};
use std::path::Path;

/// Knobs for one deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Run a login-only invocation before the upload.
    pub preflight: bool,
    pub upload_failure: UploadFailurePolicy,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            preflight: true,
            upload_failure: UploadFailurePolicy::Fail,
        }
    }
}

/// Outcome of an upload that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    pub exit: ProcessExit,
    /// Logs gathered when the upload exited non-zero.
    pub collected_logs: Vec<CollectedLog>,
}

impl DeployResult {
    pub fn succeeded(&self) -> bool {
        self.exit.success()
    }
}

/// Publishes a written manifest with steamcmd.
pub struct Deployer<'a, R: ProcessRunner + ?Sized> {
    runner: &'a R,
    location: &'a ToolLocation,
    workspace: &'a Path,
    options: DeployOptions,
}

impl<'a, R: ProcessRunner + ?Sized> Deployer<'a, R> {
    pub fn new(
        runner: &'a R,
        location: &'a ToolLocation,
        workspace: &'a Path,
        options: DeployOptions,
    ) -> Self {
        Self {
            runner,
            location,
            workspace,
            options,
        }
    }

    /// Run the full sequence for `artifact`.
    pub async fn deploy(
        &self,
        artifact: &ManifestArtifact,
        credentials: &CredentialBundle,
        diag: &mut Diagnostics,
    ) -> Result<DeployResult, DeployError> {
        stage_credentials(self.location, credentials).await?;

        if self.options.preflight {
            self.preflight(credentials).await?;
        } else {
            tracing::debug!("login pre-flight disabled");
        }

        let exit = self.upload(artifact, credentials).await?;
        if exit.success() {
            return Ok(DeployResult {
                exit,
                collected_logs: Vec::new(),
            });
        }

        tracing::error!("upload failed ({exit}); collecting steamcmd logs");
        let logs = collect_logs(&self.location.log_dir(), diag).await;

        match self.options.upload_failure {
            UploadFailurePolicy::Fail => Err(DeployError::UploadFailed { exit, logs }),
            UploadFailurePolicy::Tolerate => {
                diag.warn(Warning::upload_tolerated(format!(
                    "steamcmd upload failed ({exit}) but on_upload_failure is tolerate"
                )));
                Ok(DeployResult {
                    exit,
                    collected_logs: logs,
                })
            }
        }
    }

    /// Log in and quit; a non-zero exit means the credentials were rejected.
    pub async fn preflight(&self, credentials: &CredentialBundle) -> Result<(), DeployError> {
        let command = ToolCommand::login(&credentials.username, &credentials.password).quit();
        let exit = self.run(&command).await?;

        if exit.success() {
            tracing::info!("steamcmd login succeeded");
            Ok(())
        } else {
            Err(DeployError::AuthenticationFailed { exit })
        }
    }

    /// Log in and run the app build. Returns the raw exit status.
    pub async fn upload(
        &self,
        artifact: &ManifestArtifact,
        credentials: &CredentialBundle,
    ) -> Result<ProcessExit, DeployError> {
        let command = ToolCommand::login(&credentials.username, &credentials.password)
            .run_app_build(&artifact.manifest_path)
            .quit();
        self.run(&command).await
    }

    async fn run(&self, command: &ToolCommand) -> Result<ProcessExit, DeployError> {
        self.runner
            .run(&self.location.executable, command, self.workspace)
            .await
            .map_err(|source| DeployError::Spawn {
                program: self.location.executable.clone(),
                source,
            })
    }
}
