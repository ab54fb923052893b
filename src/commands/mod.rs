// ABOUTME: Command module aggregator for the depotpush CLI.
// ABOUTME: Re-exports generate and deploy command handlers and config loading.

mod deploy;
mod generate;
mod settings;

pub use deploy::{DeployFlags, deploy};
pub use generate::generate;
pub use settings::load_config;

use depotpush::diagnostics::Diagnostics;
use depotpush::output::Output;

/// Show collected warnings at the end of a run.
fn report_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
