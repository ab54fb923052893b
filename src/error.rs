// ABOUTME: Application-wide error types for depotpush.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::deploy::DeployError;
use crate::manifest::GenerationError;
use crate::platform::LocateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required input: {0}")]
    MissingInput(String),

    #[error("invalid input {name}: {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
