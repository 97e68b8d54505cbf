// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes, and renders deploy progress.

use serde::Serialize;
use std::io::Write;
use std::time::Instant;

use crate::deploy::{DeployProgress, DeploymentReport};
use crate::fleet::DeploymentStatus;
use crate::types::Revision;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
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
                    println!("{message} ({elapsed:.1}s)");
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                let mut event = JsonEvent::new("success", message);
                event.duration_secs = self.duration();
                self.emit(&event);
            }
        }
    }

    /// Print the outcome of a deployment.
    pub fn report(&self, report: &DeploymentReport) {
        let message = format!(
            "Deployed {} to {}/{} (deployment {})",
            report.revision.short(),
            report.stack,
            report.app,
            report.deployment_id
        );
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => self.success(&message),
            OutputMode::Json => {
                let mut event = JsonEvent::new("success", &message);
                event.duration_secs = self.duration();
                event.report = Some(report);
                self.emit(&event);
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let mut event = JsonEvent::new("error", message);
                event.duration_secs = self.duration();
                self.emit_stderr(&event);
            }
        }
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }

    fn emit_stderr(&self, event: &JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            eprintln!("{json}");
        }
    }
}

impl DeployProgress for Output {
    fn step(&self, message: &str) {
        self.progress(message);
    }

    fn poll_started(&self, revision: &Revision) {
        if self.mode == OutputMode::Normal {
            print!("Deploying {} ", revision.short());
            let _ = std::io::stdout().flush();
        }
    }

    fn poll_tick(&self) {
        if self.mode == OutputMode::Normal {
            print!(".");
            let _ = std::io::stdout().flush();
        }
    }

    fn poll_finished(&self, status: DeploymentStatus) {
        match self.mode {
            OutputMode::Normal => println!("\nStatus: {status}"),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let message = status.to_string();
                self.emit(&JsonEvent::new("status", &message));
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a DeploymentReport>,
}

impl<'a> JsonEvent<'a> {
    fn new(event: &'a str, message: &'a str) -> Self {
        Self {
            event,
            message,
            duration_secs: None,
            report: None,
        }
    }
}
