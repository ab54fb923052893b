// ABOUTME: Best-effort collection of steamcmd log files after a failed upload.
// ABOUTME: Reads every regular file in the Logs directory; problems become warnings.

use crate::diagnostics::{Diagnostics, Warning};
use std::path::Path;

/// One log file read from the tool's log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedLog {
    pub name: String,
    pub contents: String,
}

/// Read all regular files directly inside `log_dir`, sorted by name.
///
/// Sub-directories are ignored. A missing directory or unreadable file is
/// recorded as a warning and never fails the run.
pub async fn collect_logs(log_dir: &Path, diag: &mut Diagnostics) -> Vec<CollectedLog> {
    let mut entries = match tokio::fs::read_dir(log_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            diag.warn(Warning::log_unreadable(format!(
                "cannot read log directory {}: {e}",
                log_dir.display()
            )));
            return Vec::new();
        }
    };

    let mut logs = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                diag.warn(Warning::log_unreadable(format!(
                    "error listing {}: {e}",
                    log_dir.display()
                )));
                break;
            }
        };

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follows symlinks, so a link to a log file counts as a file.
        let is_file = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                diag.warn(Warning::log_unreadable(format!("cannot stat {name}: {e}")));
                continue;
            }
        };
        if !is_file {
            tracing::debug!("skipping non-file log entry {}", path.display());
            continue;
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => logs.push(CollectedLog {
                name,
                contents: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(e) => diag.warn(Warning::log_unreadable(format!("cannot read {name}: {e}"))),
        }
    }

    logs.sort_by(|a, b| a.name.cmp(&b.name));
    logs
}
