//! Build result types.
//!
//! Contains types for representing the outcome of build operations.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single component compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Compile succeeded
    Success,
    /// Compile skipped (dry run)
    Skipped,
    /// Compile failed with error
    Failed(String),
}

impl BuildStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success | BuildStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Skipped => write!(f, "skipped"),
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of compiling a single component.
#[derive(Debug, Clone)]
pub struct ComponentResult {
    /// Component identifier (`forms-textfield`)
    pub component_id: String,
    /// Build status
    pub status: BuildStatus,
    /// Artifacts produced
    pub outputs: Vec<PathBuf>,
    /// Compile duration
    pub duration: Duration,
}

impl ComponentResult {
    /// Create a successful result.
    pub fn success(component_id: String, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { component_id, status: BuildStatus::Success, outputs, duration }
    }

    /// Create a skipped result.
    pub fn skipped(component_id: String) -> Self {
        Self { component_id, status: BuildStatus::Skipped, outputs: vec![], duration: Duration::ZERO }
    }

    /// Create a failed result.
    pub fn failed(component_id: String, error: String, duration: Duration) -> Self {
        Self { component_id, status: BuildStatus::Failed(error), outputs: vec![], duration }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each component
    pub components: Vec<ComponentResult>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component result.
    pub fn add_result(&mut self, result: ComponentResult) {
        self.components.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Get the number of successful compiles.
    pub fn success_count(&self) -> usize {
        self.components.iter().filter(|r| matches!(r.status, BuildStatus::Success)).count()
    }

    /// Get the number of skipped compiles.
    pub fn skipped_count(&self) -> usize {
        self.components.iter().filter(|r| matches!(r.status, BuildStatus::Skipped)).count()
    }

    /// Get the number of failed compiles.
    pub fn failed_count(&self) -> usize {
        self.components.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get all artifacts produced.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.components.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get failed component results.
    pub fn failures(&self) -> Vec<&ComponentResult> {
        self.components.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.components.len();

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} compiled, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for component in self.failures() {
                lines.push(format!("  - {}: {}", component.component_id, component.status));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} compiled, {} skipped ({} total) in {:?}",
                success, skipped, total, self.total_duration
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_status_display() {
        assert_eq!(BuildStatus::Success.to_string(), "success");
        assert_eq!(BuildStatus::Skipped.to_string(), "skipped");
        assert_eq!(BuildStatus::Failed("error".to_string()).to_string(), "failed: error");
    }

    #[test]
    fn test_build_status_is_success() {
        assert!(BuildStatus::Success.is_success());
        assert!(BuildStatus::Skipped.is_success());
        assert!(!BuildStatus::Failed("error".to_string()).is_success());
    }

    #[test]
    fn test_component_result_success() {
        let result = ComponentResult::success(
            "forms-textfield".to_string(),
            vec![PathBuf::from("js/formsTextfield.js"), PathBuf::from("css/formsTextfield.css")],
            Duration::from_millis(100),
        );

        assert!(result.is_success());
        assert_eq!(result.outputs.len(), 2);
    }

    #[test]
    fn test_component_result_failed() {
        let result = ComponentResult::failed(
            "navbar".to_string(),
            "Unexpected token".to_string(),
            Duration::from_millis(50),
        );

        assert!(!result.is_success());
        assert!(result.outputs.is_empty());
    }

    #[test]
    fn test_build_result_counts() {
        let mut result = BuildResult::new();
        result.add_result(ComponentResult::success("a".to_string(), vec![], Duration::ZERO));
        result.add_result(ComponentResult::skipped("b".to_string()));
        result.add_result(ComponentResult::failed(
            "c".to_string(),
            "error".to_string(),
            Duration::ZERO,
        ));

        assert_eq!(result.success_count(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.failed_count(), 1);
        assert!(!result.is_success());
    }

    #[test]
    fn test_build_result_all_outputs() {
        let mut result = BuildResult::new();
        result.add_result(ComponentResult::success(
            "a".to_string(),
            vec![PathBuf::from("js/a.js"), PathBuf::from("css/a.css")],
            Duration::ZERO,
        ));
        result.add_result(ComponentResult::success(
            "b".to_string(),
            vec![PathBuf::from("js/b.js")],
            Duration::ZERO,
        ));

        assert_eq!(result.all_outputs().len(), 3);
    }

    #[test]
    fn test_build_result_summary_success() {
        let mut result = BuildResult::new();
        result.add_result(ComponentResult::success(
            "navbar".to_string(),
            vec![],
            Duration::from_millis(100),
        ));

        let summary = result.with_duration(Duration::from_millis(100)).summary();
        assert!(summary.contains("Build succeeded"));
        assert!(summary.contains("1 compiled"));
    }

    #[test]
    fn test_build_result_summary_lists_failures() {
        let mut result = BuildResult::new();
        result.add_result(ComponentResult::failed(
            "forms-textfield".to_string(),
            "compiler exited with 1".to_string(),
            Duration::ZERO,
        ));

        let summary = result.summary();
        assert!(summary.starts_with("Build failed: 0 compiled, 0 skipped, 1 failed"));
        assert!(summary.contains("forms-textfield: failed: compiler exited with 1"));
    }
}
