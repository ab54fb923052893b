// ABOUTME: Credential configuration for steamcmd login and sentry staging.
// ABOUTME: Resolves env references and decodes base64 transport blobs into a CredentialBundle.

use super::EnvValue;
use crate::deploy::CredentialBundle;
use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;

/// Credential sources; every field is required by the time a deploy runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: Option<EnvValue>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    /// Base64 of `config/config.vdf`.
    #[serde(default)]
    pub config_vdf: Option<EnvValue>,

    #[serde(default)]
    pub sentry_file_name: Option<EnvValue>,

    /// Base64 of the sentry file.
    #[serde(default)]
    pub sentry_file_contents: Option<EnvValue>,
}

impl CredentialsConfig {
    /// Overlay every field set in `other`.
    pub fn merge(&mut self, other: CredentialsConfig) {
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.config_vdf.is_some() {
            self.config_vdf = other.config_vdf;
        }
        if other.sentry_file_name.is_some() {
            self.sentry_file_name = other.sentry_file_name;
        }
        if other.sentry_file_contents.is_some() {
            self.sentry_file_contents = other.sentry_file_contents;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CredentialsConfig::default()
    }

    /// Resolve every source and decode the binary blobs.
    pub fn resolve(&self) -> Result<CredentialBundle> {
        Ok(CredentialBundle {
            username: required(&self.username, "username")?,
            password: required(&self.password, "password")?,
            session_config: decode(&required(&self.config_vdf, "configVdf")?, "configVdf")?,
            sentry_file_name: required(&self.sentry_file_name, "ssfnFileName")?,
            sentry_file: decode(
                &required(&self.sentry_file_contents, "ssfnFileContents")?,
                "ssfnFileContents",
            )?,
        })
    }
}

fn required(value: &Option<EnvValue>, name: &str) -> Result<String> {
    let resolved = value
        .as_ref()
        .ok_or_else(|| Error::MissingInput(name.to_string()))?
        .resolve()?;
    if resolved.is_empty() {
        return Err(Error::MissingInput(name.to_string()));
    }
    Ok(resolved)
}

fn decode(encoded: &str, name: &str) -> Result<Vec<u8>> {
    // Multi-line secrets are common when pasted from `base64` output.
    let compact: String = encoded.split_whitespace().collect();
    BASE64
        .decode(compact)
        .map_err(|e| Error::InvalidInput {
            name: name.to_string(),
            reason: format!("invalid base64: {e}"),
        })
}
