// ABOUTME: GitHub Actions boundary: reads INPUT_* variables and writes step outputs.
// ABOUTME: Inputs are collected once here and merged into a Config.

use crate::config::{Config, CredentialsConfig, EnvValue};
use crate::error::{Error, Result};
use crate::types::{AppId, DepotSlot, DepotSlots};
use std::io::Write;
use std::path::PathBuf;

/// Environment variable carrying an action input, as the Actions runner names it.
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Action inputs. Unset and empty inputs are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionInputs {
    pub app_id: Option<String>,
    pub depots: DepotSlots,
    pub build_description: Option<String>,
    pub root_path: Option<String>,
    pub release_branch: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub config_vdf: Option<String>,
    pub ssfn_file_name: Option<String>,
    pub ssfn_file_contents: Option<String>,
    pub steam_dir: Option<String>,
}

impl ActionInputs {
    /// Read inputs from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(input_var(name)).ok())
    }

    /// Read inputs through `lookup`, keyed by input name (e.g. `appId`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut depots = DepotSlots::new();
        for slot in DepotSlot::all() {
            if let Some(path) = get(&format!("depot{slot}Path")) {
                depots.set(slot, path);
            }
        }

        Self {
            app_id: get("appId"),
            depots,
            build_description: get("buildDescription"),
            root_path: get("rootPath"),
            release_branch: get("releaseBranch"),
            username: get("username"),
            password: get("password"),
            config_vdf: get("configVdf"),
            ssfn_file_name: get("ssfnFileName"),
            ssfn_file_contents: get("ssfnFileContents"),
            steam_dir: get("steamdir"),
        }
    }

    /// Overlay these inputs onto `config`. Inputs win over file values.
    pub fn apply(self, mut config: Config) -> Result<Config> {
        if let Some(raw) = self.app_id {
            let app_id = raw.parse::<AppId>().map_err(|e| Error::InvalidInput {
                name: "appId".to_string(),
                reason: e.to_string(),
            })?;
            config.app_id = Some(app_id);
        }
        config.depots.merge(&self.depots);
        if let Some(desc) = self.build_description {
            config.description = Some(desc);
        }
        if let Some(root) = self.root_path {
            config.root_path = root;
        }
        if let Some(branch) = self.release_branch {
            config.release_branch = Some(branch);
        }
        if let Some(dir) = self.steam_dir {
            config.steam_dir = Some(PathBuf::from(dir));
        }

        let literal = |v: Option<String>| v.map(EnvValue::Literal);
        config.credentials.merge(CredentialsConfig {
            username: literal(self.username),
            password: literal(self.password),
            config_vdf: literal(self.config_vdf),
            sentry_file_name: literal(self.ssfn_file_name),
            sentry_file_contents: literal(self.ssfn_file_contents),
        });

        Ok(config)
    }
}

/// Step outputs and workflow commands.
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    output_file: Option<PathBuf>,
    workflow_commands: bool,
}

impl ActionOutputs {
    pub fn new(output_file: Option<PathBuf>, workflow_commands: bool) -> Self {
        Self {
            output_file,
            workflow_commands,
        }
    }

    /// Use `GITHUB_OUTPUT` and `GITHUB_ACTIONS` from the environment.
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let workflow_commands = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        Self::new(output_file, workflow_commands)
    }

    /// Append `name=value` to the step output file, if there is one.
    pub fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        let Some(path) = &self.output_file else {
            tracing::debug!("no GITHUB_OUTPUT file; not recording output {name}");
            return Ok(());
        };

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        if value.contains('\n') {
            let delimiter = format!("depotpush_{}", std::process::id());
            writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")
        } else {
            writeln!(file, "{name}={value}")
        }
    }

    /// Ask the runner to redact `secret` from all subsequent log output.
    pub fn mask(&self, secret: &str) {
        if self.workflow_commands && !secret.is_empty() {
            println!("::add-mask::{secret}");
        }
    }

    /// Start a collapsible log group.
    pub fn group(&self, title: &str) {
        if self.workflow_commands {
            println!("::group::{title}");
        }
    }

    pub fn end_group(&self) {
        if self.workflow_commands {
            println!("::endgroup::");
        }
    }
}
