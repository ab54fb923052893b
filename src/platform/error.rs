// ABOUTME: Tool location error types with SNAFU pattern.
// ABOUTME: Covers unsupported platforms and a steamcmd that cannot be found.

use snafu::Snafu;
use std::path::PathBuf;

/// Failure to resolve where steamcmd and its configuration live.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LocateError {
    #[snafu(display("unsupported platform: {os} (expected linux, macos or windows)"))]
    UnsupportedPlatform { os: String },

    #[snafu(display("steamcmd not found (searched: {})", join_paths(searched)))]
    ExecutableNotFound { searched: Vec<PathBuf> },

    #[snafu(display("home directory is not set; configure steam_dir explicitly"))]
    HomeNotSet,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateErrorKind {
    UnsupportedPlatform,
    ExecutableNotFound,
    HomeNotSet,
}

impl LocateError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> LocateErrorKind {
        match self {
            LocateError::UnsupportedPlatform { .. } => LocateErrorKind::UnsupportedPlatform,
            LocateError::ExecutableNotFound { .. } => LocateErrorKind::ExecutableNotFound,
            LocateError::HomeNotSet => LocateErrorKind::HomeNotSet,
        }
    }

    /// Candidate paths that were checked, if the executable was not found.
    pub fn searched(&self) -> &[PathBuf] {
        match self {
            LocateError::ExecutableNotFound { searched } => searched,
            _ => &[],
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
