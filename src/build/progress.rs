//! Build progress reporting.
//!
//! Everything the build has to say goes through a [`ProgressReporter`]:
//! the console reporter prints human-readable lines to stderr, the JSON
//! reporter prints one object per line for CI tooling.
//!
//! # Example
//!
//! ```ignore
//! use felib_build::build::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//!
//! let reporter = ConsoleProgress::new();
//! reporter.report(ProgressEvent::BuildStarted { target: "admin".into(), total_components: 10 });
//! ```

use crate::build::result::BuildStatus;
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Events that can be reported during a build.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Build process started
    BuildStarted {
        /// Build target name
        target: String,
        /// Number of discovered component sources
        total_components: usize,
    },
    /// A component compile started
    ComponentStarted {
        /// Component identifier
        component_id: String,
    },
    /// A component compile completed
    ComponentCompleted {
        /// Component identifier
        component_id: String,
        /// Build status
        status: BuildStatus,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Manifests were regenerated
    ManifestsWritten {
        /// Entries in js.txt
        scripts: usize,
        /// Entries in css.txt
        styles: usize,
    },
    /// Build process completed
    BuildCompleted {
        /// Whether the overall build succeeded
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of compiled components
        succeeded: usize,
        /// Number of skipped components
        skipped: usize,
        /// Number of failed components
        failed: usize,
    },
    /// Informational message, shown in verbose mode
    Info {
        /// Message text
        message: String,
    },
    /// A warning was generated
    Warning {
        /// Component that generated the warning (if applicable)
        component_id: Option<String>,
        /// Warning message
        message: String,
    },
    /// An error occurred
    Error {
        /// Component that generated the error (if applicable)
        component_id: Option<String>,
        /// Error message
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Completed component count
    current: AtomicUsize,
    /// Total component count
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a new console progress reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn prefixed(component_id: Option<String>) -> String {
    match component_id {
        Some(id) => format!("{}: ", id),
        None => String::new(),
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BuildStarted { target, total_components } => {
                self.total.store(total_components, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                self.writeln(&format!(
                    "{} Building felib {} ({} component{})...",
                    self.cyan("[build]"),
                    self.bold(&target),
                    total_components,
                    if total_components == 1 { "" } else { "s" }
                ));
            }
            ProgressEvent::ComponentStarted { component_id } => {
                if self.verbose {
                    self.writeln(&format!("{} Compiling {}...", self.cyan("[build]"), component_id));
                }
            }
            ProgressEvent::ComponentCompleted { component_id, status, duration_ms } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);

                let status_str = match &status {
                    BuildStatus::Success => self.green("ok"),
                    BuildStatus::Skipped => self.yellow("skipped"),
                    BuildStatus::Failed(_) => self.red("FAILED"),
                };

                self.writeln(&format!(
                    "{} [{}/{}] {} {} ({})",
                    self.cyan("[build]"),
                    current,
                    total,
                    status_str,
                    component_id,
                    format_duration(duration_ms)
                ));

                if let BuildStatus::Failed(err) = status {
                    self.writeln(&format!("        {}", self.red(&err)));
                }
            }
            ProgressEvent::ManifestsWritten { scripts, styles } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} js.txt: {} entries, css.txt: {} entries",
                        self.cyan("[manifest]"),
                        scripts,
                        styles
                    ));
                }
            }
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, skipped, failed } => {
                let duration_str = format_duration(duration_ms);
                let total = succeeded + skipped + failed;

                if success {
                    self.writeln(&format!(
                        "\n{} {} {} compiled, {} skipped in {}",
                        self.green("[done]"),
                        self.bold(&format!("{}", succeeded)),
                        if succeeded == 1 { "component" } else { "components" },
                        skipped,
                        duration_str
                    ));
                } else {
                    self.writeln(&format!(
                        "\n{} Build failed: {} of {} compiled, {} {} in {}",
                        self.red("[error]"),
                        succeeded,
                        total,
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        duration_str
                    ));
                }
            }
            ProgressEvent::Info { message } => {
                if self.verbose {
                    self.writeln(&format!("{} {}", self.cyan("[info]"), message));
                }
            }
            ProgressEvent::Warning { component_id, message } => {
                self.writeln(&format!(
                    "{} {}{}",
                    self.yellow("[warn]"),
                    prefixed(component_id),
                    message
                ));
            }
            ProgressEvent::Error { component_id, message } => {
                self.writeln(&format!("{} {}{}", self.red("[error]"), prefixed(component_id), message));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
pub struct JsonProgress {
    /// Output writer
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", value);
        }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let value = match event {
            ProgressEvent::BuildStarted { target, total_components } => json!({
                "event": "build_started",
                "target": target,
                "total_components": total_components,
            }),
            ProgressEvent::ComponentStarted { component_id } => json!({
                "event": "component_started",
                "component_id": component_id,
            }),
            ProgressEvent::ComponentCompleted { component_id, status, duration_ms } => {
                let mut value = json!({
                    "event": "component_completed",
                    "component_id": component_id,
                    "status": match &status {
                        BuildStatus::Success => "success",
                        BuildStatus::Skipped => "skipped",
                        BuildStatus::Failed(_) => "failed",
                    },
                    "duration_ms": duration_ms,
                });
                if let BuildStatus::Failed(err) = status {
                    value["error"] = json!(err);
                }
                value
            }
            ProgressEvent::ManifestsWritten { scripts, styles } => json!({
                "event": "manifests_written",
                "scripts": scripts,
                "styles": styles,
            }),
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, skipped, failed } => {
                json!({
                    "event": "build_completed",
                    "success": success,
                    "duration_ms": duration_ms,
                    "succeeded": succeeded,
                    "skipped": skipped,
                    "failed": failed,
                })
            }
            ProgressEvent::Info { message } => json!({ "event": "info", "message": message }),
            ProgressEvent::Warning { component_id, message } => {
                let mut value = json!({ "event": "warning", "message": message });
                if let Some(id) = component_id {
                    value["component_id"] = json!(id);
                }
                value
            }
            ProgressEvent::Error { component_id, message } => {
                let mut value = json!({ "event": "error", "message": message });
                if let Some(id) = component_id {
                    value["component_id"] = json!(id);
                }
                value
            }
        };
        self.write_json(value);
    }
}

/// Progress tracker for aggregating build statistics.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    /// Start time of the build
    start_time: Option<Instant>,
    /// Total number of components
    total: usize,
    /// Number of completed components
    completed: usize,
    /// Number of compiled components
    succeeded: usize,
    /// Number of skipped components
    skipped: usize,
    /// Number of failed components
    failed: usize,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a build.
    pub fn start(&mut self, total_components: usize) {
        self.start_time = Some(Instant::now());
        self.total = total_components;
        self.completed = 0;
        self.succeeded = 0;
        self.skipped = 0;
        self.failed = 0;
    }

    /// Record a finished component.
    pub fn component_completed(&mut self, status: &BuildStatus) {
        self.completed += 1;
        match status {
            BuildStatus::Success => self.succeeded += 1,
            BuildStatus::Skipped => self.skipped += 1,
            BuildStatus::Failed(_) => self.failed += 1,
        }
    }

    /// Get the elapsed time since the build started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Check if every component has finished.
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    /// Check if the build was successful.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get the number of compiled components.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Get the number of failed components.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Generate a BuildCompleted event from current state.
    pub fn build_completed_event(&self) -> ProgressEvent {
        ProgressEvent::BuildCompleted {
            success: self.is_success(),
            duration_ms: self.elapsed().as_millis() as u64,
            succeeded: self.succeeded,
            skipped: self.skipped,
            failed: self.failed,
        }
    }
}

/// Format a duration in milliseconds to a human-readable string.
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
