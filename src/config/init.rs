// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a depotpush.yml template with env references for secrets.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{AppId, DepotSlot};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, app_id: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let app_id = match app_id {
        Some(raw) => raw.parse::<AppId>().map_err(|e| Error::InvalidInput {
            name: "appId".to_string(),
            reason: e.to_string(),
        })?,
        None => AppId::new(480),
    };

    std::fs::write(&config_path, generate_template_yaml(app_id))?;

    Ok(())
}

fn generate_template_yaml(app_id: AppId) -> String {
    let first_depot = DepotSlot::new(1)
        .ok()
        .and_then(|slot| app_id.depot(slot))
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        r#"app_id: {app_id}
root_path: .
# description: nightly
# release_branch: beta

# Slot N uploads to depot app_id + N (slot 1 -> depot {first_depot}).
depots:
  1: build/linux

# preflight: true
# on_upload_failure: fail

credentials:
  username:
    env: STEAM_USERNAME
  password:
    env: STEAM_PASSWORD
  config_vdf:
    env: STEAM_CONFIG_VDF
  sentry_file_name:
    env: STEAM_SSFN_FILE_NAME
  sentry_file_contents:
    env: STEAM_SSFN_FILE_CONTENTS
"#
    )
}
