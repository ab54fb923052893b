// ABOUTME: Process execution seam for invoking steamcmd.
// ABOUTME: ProcessRunner trait, the tokio-backed runner, and secret-masking command lines.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// One argument of a tool command line.
#[derive(Clone, PartialEq, Eq)]
pub enum ToolArg {
    Plain(String),
    /// Passed to the process as-is but never displayed.
    Secret(String),
}

impl ToolArg {
    pub fn as_str(&self) -> &str {
        match self {
            ToolArg::Plain(s) | ToolArg::Secret(s) => s,
        }
    }
}

impl fmt::Debug for ToolArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolArg::Plain(s) => write!(f, "{s:?}"),
            ToolArg::Secret(_) => f.write_str("\"***\""),
        }
    }
}

impl fmt::Display for ToolArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolArg::Plain(s) => f.write_str(s),
            ToolArg::Secret(_) => f.write_str("***"),
        }
    }
}

/// A steamcmd command script such as `+login user pass +quit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCommand {
    args: Vec<ToolArg>,
}

impl ToolCommand {
    /// Start a script with `+login <user> <pass>`.
    pub fn login(username: &str, password: &str) -> Self {
        Self {
            args: vec![
                ToolArg::Plain("+login".to_string()),
                ToolArg::Plain(username.to_string()),
                ToolArg::Secret(password.to_string()),
            ],
        }
    }

    pub fn run_app_build(mut self, manifest: &Path) -> Self {
        self.args.push(ToolArg::Plain("+run_app_build".to_string()));
        self.args
            .push(ToolArg::Plain(manifest.to_string_lossy().into_owned()));
        self
    }

    pub fn quit(mut self) -> Self {
        self.args.push(ToolArg::Plain("+quit".to_string()));
        self
    }

    /// Raw argument strings, secrets included.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(ToolArg::as_str)
    }

    /// Whether the script contains the given `+command`.
    pub fn contains(&self, command: &str) -> bool {
        self.args
            .iter()
            .any(|a| matches!(a, ToolArg::Plain(s) if s == command))
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

/// How a tool process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Runs an external program to completion.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `command` in `cwd` and wait for it to exit.
    ///
    /// A non-zero exit is reported through [`ProcessExit`], not as an error;
    /// errors are reserved for failing to start the process at all.
    async fn run(
        &self,
        program: &Path,
        command: &ToolCommand,
        cwd: &Path,
    ) -> std::io::Result<ProcessExit>;
}

/// Runs processes with tokio, streaming their output to this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(
        &self,
        program: &Path,
        command: &ToolCommand,
        cwd: &Path,
    ) -> std::io::Result<ProcessExit> {
        tracing::info!("Running {} {} (in {})", program.display(), command, cwd.display());

        let status = Command::new(program)
            .args(command.argv())
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        let exit = ProcessExit {
            code: status.code(),
        };
        tracing::info!("{} finished: {}", program.display(), exit);
        Ok(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_script() {
        let cmd = ToolCommand::login("builder", "hunter2").quit();
        assert_eq!(
            cmd.argv().collect::<Vec<_>>(),
            vec!["+login", "builder", "hunter2", "+quit"]
        );
    }

    #[test]
    fn upload_script() {
        let cmd = ToolCommand::login("builder", "hunter2")
            .run_app_build(Path::new("/work/manifest.vdf"))
            .quit();
        assert_eq!(
            cmd.argv().collect::<Vec<_>>(),
            vec![
                "+login",
                "builder",
                "hunter2",
                "+run_app_build",
                "/work/manifest.vdf",
                "+quit"
            ]
        );
        assert!(cmd.contains("+run_app_build"));
    }

    #[test]
    fn display_and_debug_mask_password() {
        let cmd = ToolCommand::login("builder", "hunter2").quit();
        assert_eq!(cmd.to_string(), "+login builder *** +quit");
        assert!(!format!("{cmd:?}").contains("hunter2"));
    }

    #[test]
    fn exit_status_classification() {
        assert!(ProcessExit::from_code(0).success());
        assert!(!ProcessExit::from_code(5).success());
        assert!(!ProcessExit { code: None }.success());
        assert_eq!(ProcessExit { code: None }.to_string(), "terminated by signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let exit = TokioRunner
            .run(
                Path::new("/bin/sh"),
                &ToolCommand {
                    args: vec![
                        ToolArg::Plain("-c".to_string()),
                        ToolArg::Plain("exit 3".to_string()),
                    ],
                },
                dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(exit.code, Some(3));
    }

    #[tokio::test]
    async fn tokio_runner_missing_program_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TokioRunner
            .run(
                &dir.path().join("no-such-steamcmd"),
                &ToolCommand::login("u", "p").quit(),
                dir.path(),
            )
            .await;
        assert!(result.is_err());
    }
}
