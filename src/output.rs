// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output (only final result and failures)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => emit_stdout(&JsonEvent {
                event: "success",
                message,
                name: None,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "warning",
                message,
                name: None,
                duration_secs: None,
            }),
        }
    }

    /// Echo a generated file so it shows up in the job log.
    pub fn generated_file(&self, name: &str, contents: &str) {
        match self.mode {
            OutputMode::Normal => {
                println!("----- {name} -----");
                println!("{}", contents.trim_end());
            }
            OutputMode::Quiet => {}
            OutputMode::Json => emit_stdout(&JsonEvent {
                event: "file",
                message: contents,
                name: Some(name),
                duration_secs: None,
            }),
        }
    }

    /// Print the contents of a tool log file. Shown in every mode.
    pub fn log_file(&self, name: &str, contents: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("----- {name} -----");
                eprintln!("{}", contents.trim_end());
            }
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "log",
                message: contents,
                name: Some(name),
                duration_secs: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "error",
                message,
                name: None,
                duration_secs: self.duration(),
            }),
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

fn emit_stdout(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_stderr(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}
