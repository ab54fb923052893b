// ABOUTME: Collects configuration once at the CLI boundary.
// ABOUTME: Loads depotpush.yml when present and overlays GitHub Actions inputs.

use depotpush::action::ActionInputs;
use depotpush::config::Config;
use depotpush::error::Result;
use std::path::Path;

/// Resolve the effective configuration for this run.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let base = match explicit {
        Some(path) => Config::load_required(path)?,
        None => Config::discover(cwd)?.unwrap_or_default(),
    };
    ActionInputs::from_env().apply(base)
}
