//! Build context containing configuration and paths for one build target.

use crate::build::manifest::AssetKind;
use crate::config::FelibConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Invalid build target name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetNameError {
    /// Empty name
    #[error("build target name must not be empty")]
    Empty,
    /// Name would not resolve to a single subdirectory of the output base
    #[error("build target name '{0}' must be a plain directory name")]
    NotADirectoryName(String),
}

/// Check that a build target names exactly one output subdirectory.
pub fn validate_target_name(name: &str) -> Result<(), TargetNameError> {
    if name.is_empty() {
        return Err(TargetNameError::Empty);
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(TargetNameError::NotADirectoryName(name.to_string()));
    }
    Ok(())
}

/// Build context containing configuration and paths for a build operation.
///
/// Every path the build writes to is derived from this value, so nothing
/// depends on process-wide state.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: FelibConfig,
    /// Project root directory (where felib.toml is located)
    project_root: PathBuf,
    /// Build target (felib) name
    target: String,
}

impl BuildContext {
    /// Create a new build context for the named target.
    pub fn new(
        config: FelibConfig,
        project_root: PathBuf,
        target: impl Into<String>,
    ) -> Result<Self, TargetNameError> {
        let target = target.into();
        validate_target_name(&target)?;
        Ok(Self { config, project_root, target })
    }

    /// Get the configuration.
    pub fn config(&self) -> &FelibConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Name of the build target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Base directory scanned for component sources.
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Suffix that identifies component sources.
    pub fn source_suffix(&self) -> &str {
        &self.config.project.extension
    }

    /// Output directory of this target (`<out>/<target>`).
    pub fn target_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out).join(&self.target)
    }

    /// Directory holding the artifacts of one kind.
    pub fn asset_dir(&self, kind: AssetKind) -> PathBuf {
        self.target_dir().join(kind.dir_name())
    }

    /// First line of every manifest.
    pub fn manifest_marker(&self) -> &str {
        &self.config.manifest.marker
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::loader::resolve_path(&self.project_root, path)
    }
}
