// ABOUTME: Policy for a non-zero exit from the steamcmd upload step.
// ABOUTME: Supports fail (default) and tolerate.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// What to do when the upload invocation exits non-zero.
///
/// Logs are collected either way. A failed login pre-flight is always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadFailurePolicy {
    #[default]
    Fail,
    Tolerate,
}

impl FromStr for UploadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(UploadFailurePolicy::Fail),
            "tolerate" => Ok(UploadFailurePolicy::Tolerate),
            _ => Err(format!("unknown upload failure policy: {}", s)),
        }
    }
}

impl fmt::Display for UploadFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailurePolicy::Fail => write!(f, "fail"),
            UploadFailurePolicy::Tolerate => write!(f, "tolerate"),
        }
    }
}

impl<'de> Deserialize<'de> for UploadFailurePolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
