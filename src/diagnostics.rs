// ABOUTME: Diagnostics accumulator for non-fatal warnings during a publish run.
// ABOUTME: Collects skipped depots, unreadable logs, and similar issues to show at the end.

/// Collects non-fatal warnings during generation and deployment.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Warnings of a single kind.
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A configured depot whose content path does not exist.
    pub fn depot_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DepotSkipped,
            message: message.into(),
        }
    }

    /// A tool log file or the log directory could not be read.
    pub fn log_unreadable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogUnreadable,
            message: message.into(),
        }
    }

    /// The upload failed but the failure policy let the run continue.
    pub fn upload_tolerated(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UploadTolerated,
            message: message.into(),
        }
    }

    /// Create a lock release warning.
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Depot slot excluded because its content path is missing.
    DepotSkipped,
    /// Tool log could not be read while collecting failure diagnostics.
    LogUnreadable,
    /// Non-zero upload exit accepted under the tolerate policy.
    UploadTolerated,
    /// Failed to release the config directory lock (lock file may remain).
    LockRelease,
}
