// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording fake ProcessRunner and credential/tool fixtures.

use async_trait::async_trait;
use depotpush::deploy::CredentialBundle;
use depotpush::platform::ToolLocation;
use depotpush::process::{ProcessExit, ProcessRunner, ToolCommand};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One recorded process invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Call {
    pub fn is_upload(&self) -> bool {
        self.args.iter().any(|a| a == "+run_app_build")
    }
}

/// Fake runner that records calls and replays scripted exits in order.
///
/// Once the script runs out, every further call exits 0.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Call>>,
    exits: Mutex<VecDeque<std::io::Result<ProcessExit>>>,
}

// Each test binary only uses some of these helpers, so allow dead_code.
#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue exit codes for successive calls.
    pub fn with_exits(codes: &[i32]) -> Self {
        let runner = Self::default();
        runner
            .exits
            .lock()
            .extend(codes.iter().map(|c| Ok(ProcessExit::from_code(*c))));
        runner
    }

    /// Make the next call fail to spawn.
    pub fn failing_spawn() -> Self {
        let runner = Self::default();
        runner.exits.lock().push_back(Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        )));
        runner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(
        &self,
        program: &Path,
        command: &ToolCommand,
        cwd: &Path,
    ) -> std::io::Result<ProcessExit> {
        self.calls.lock().push(Call {
            program: program.to_path_buf(),
            args: command.argv().map(str::to_string).collect(),
            cwd: cwd.to_path_buf(),
        });
        self.exits
            .lock()
            .pop_front()
            .unwrap_or(Ok(ProcessExit::from_code(0)))
    }
}

#[allow(dead_code)]
pub fn credentials() -> CredentialBundle {
    CredentialBundle {
        username: "builder".to_string(),
        password: "hunter2".to_string(),
        session_config: b"\"InstallConfigStore\"\n{\n}\n".to_vec(),
        sentry_file_name: "ssfn4242".to_string(),
        sentry_file: vec![1, 2, 3, 4],
    }
}

#[allow(dead_code)]
pub fn tool_location(root: &Path) -> ToolLocation {
    ToolLocation {
        executable: root.join("steamcmd.sh"),
        config_dir: root.join("Steam"),
    }
}
