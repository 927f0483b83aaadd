//! Configuration schema types for `felib.toml`
//!
//! Defines the structure and validation rules for felib project configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Project paths section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Base directory scanned for component sources
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Base output directory; each build target gets a subdirectory
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// File name suffix of component sources
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_src() -> PathBuf {
    PathBuf::from("src/main/content/jcr_root/apps")
}

fn default_out() -> PathBuf {
    PathBuf::from("target/classes/etc/felibs")
}

fn default_extension() -> String {
    ".vue".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { src: default_src(), out: default_out(), extension: default_extension() }
    }
}

/// External template compiler invocation
///
/// `args` may contain the placeholders `{source}`, `{js}`, `{css}`,
/// `{module}`, `{component}`, `{format}`, `{globals}` and
/// `{compile_template}`.
///
/// The default runs `node buildscripts/compile-component.js` from the
/// project root, once per component, with these arguments:
///
/// - `--input`: component source file
/// - `--js`: script bundle to write, `<target>/js/<camelCase>.js`
/// - `--css`: stylesheet to write, `<target>/css/<camelCase>.css`
/// - `--name`: bundle module name, `cmp<CamelCase>`
/// - `--format`: bundle format, `iife` unless configured
/// - `--globals`: external imports as `id:global` pairs joined by `,`
/// - `--compile-template`: `true` or `false`
///
/// The script must write the bundle to `--js` and exit 0. Writing the
/// stylesheet is optional; a missing one is created empty. A non-zero exit
/// fails the component and whatever the script printed to stderr becomes
/// the failure message. The script is not shipped with this crate; projects
/// provide it or point `program`/`args` at their own bundler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Program to execute
    #[serde(default = "default_compiler_program")]
    pub program: String,
    /// Arguments passed to the program
    #[serde(default = "default_compiler_args")]
    pub args: Vec<String>,
    /// Bundle format handed to the bundler
    #[serde(default = "default_format")]
    pub format: String,
    /// Whether component templates are compiled into render functions
    #[serde(default = "default_true")]
    pub compile_template: bool,
    /// Global variable names for external imports (import id -> global)
    #[serde(default = "default_globals")]
    pub globals: BTreeMap<String, String>,
}

fn default_compiler_program() -> String {
    "node".to_string()
}

fn default_compiler_args() -> Vec<String> {
    [
        "buildscripts/compile-component.js",
        "--input",
        "{source}",
        "--js",
        "{js}",
        "--css",
        "{css}",
        "--name",
        "{module}",
        "--format",
        "{format}",
        "--globals",
        "{globals}",
        "--compile-template",
        "{compile_template}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_format() -> String {
    "iife".to_string()
}

fn default_globals() -> BTreeMap<String, String> {
    let mut globals = BTreeMap::new();
    globals.insert("tools".to_string(), "tools".to_string());
    globals.insert("log".to_string(), "log".to_string());
    globals
}

fn default_true() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_compiler_program(),
            args: default_compiler_args(),
            format: default_format(),
            compile_template: true,
            globals: default_globals(),
        }
    }
}

/// Build execution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of parallel compiles (0 = available parallelism)
    #[serde(default)]
    pub jobs: usize,
    /// Stop starting new compiles after the first failure
    #[serde(default)]
    pub fail_fast: bool,
}

/// Manifest output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// First line of every manifest file
    #[serde(default = "default_marker")]
    pub marker: String,
}

pub(crate) fn default_marker() -> String {
    "<!-- auto generated by build -->".to_string()
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self { marker: default_marker() }
    }
}

/// Upload hook run after a successful build when requested on the command line
///
/// `args` may contain `{target}` and `{target_dir}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Program to execute; no upload is performed when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
}

/// Watch mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default)]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms(), clear_screen: false }
    }
}

/// Complete felib.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FelibConfig {
    /// Source and output paths
    #[serde(default)]
    pub project: ProjectConfig,
    /// External compiler command
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Build execution settings
    #[serde(default)]
    pub build: BuildConfig,
    /// Manifest settings
    #[serde(default)]
    pub manifest: ManifestConfig,
    /// Upload hook
    #[serde(default)]
    pub upload: UploadConfig,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// A single configuration validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path of the offending field
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FelibConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.extension.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.extension".to_string(),
                message: "must be a non-empty suffix such as \".vue\"".to_string(),
            });
        }

        if self.compiler.program.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "compiler.program".to_string(),
                message: "must name an executable".to_string(),
            });
        }

        if self.compiler.format.is_empty() {
            errors.push(ConfigValidationError {
                field: "compiler.format".to_string(),
                message: "must be a non-empty bundle format".to_string(),
            });
        }

        if self.manifest.marker.is_empty() || self.manifest.marker.contains('\n') {
            errors.push(ConfigValidationError {
                field: "manifest.marker".to_string(),
                message: "must be a single non-empty line".to_string(),
            });
        }

        if let Some(program) = &self.upload.program {
            if program.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: "upload.program".to_string(),
                    message: "must name an executable when set".to_string(),
                });
            }
        }

        errors
    }
}
