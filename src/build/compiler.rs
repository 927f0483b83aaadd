//! Component compilation.
//!
//! Turning a `.vue` component into a script bundle and a stylesheet is the
//! job of an external bundler. [`ComponentCompiler`] is the seam the build
//! pipeline talks to; [`ProcessCompiler`] drives a configured command line.

use crate::build::component::ComponentOutputs;
use crate::build::naming::ComponentName;
use crate::build::process::{CommandSpec, ProcessError};
use crate::config::CompilerConfig;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Error compiling a single component.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The external compiler failed
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// The compiler reported success but an artifact is missing
    #[error("compiler did not produce {0}")]
    MissingArtifact(PathBuf),
    /// IO error handling the artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Any other compiler-specific failure
    #[error("{0}")]
    Other(String),
}

/// Everything a compiler needs to build one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Component source file
    pub source: PathBuf,
    /// Derived component names
    pub name: ComponentName,
    /// Artifact destinations
    pub outputs: ComponentOutputs,
}

impl CompileRequest {
    /// Bundle module name (`cmp<Capitalized>`).
    pub fn module_name(&self) -> String {
        self.name.module_name()
    }
}

/// Artifacts produced by a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifacts {
    /// Script bundle
    pub script: PathBuf,
    /// Stylesheet
    pub style: PathBuf,
}

impl CompiledArtifacts {
    /// Both paths, script first.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        vec![self.script.clone(), self.style.clone()]
    }
}

/// Capability to compile one component into its artifacts.
pub trait ComponentCompiler: Send + Sync {
    /// Compile the component described by `request`.
    fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifacts, CompileError>;
}

/// Compiler that runs an external command per component.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    command: CommandSpec,
    format: String,
    compile_template: bool,
    globals: String,
    cwd: PathBuf,
}

impl ProcessCompiler {
    /// Create a compiler from configuration, running commands in `cwd`.
    pub fn new(config: &CompilerConfig, cwd: PathBuf) -> Self {
        let globals = config
            .globals
            .iter()
            .map(|(id, global)| format!("{}:{}", id, global))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            command: CommandSpec::new(config.program.clone(), config.args.clone()),
            format: config.format.clone(),
            compile_template: config.compile_template,
            globals,
            cwd,
        }
    }

    /// Placeholder values for one request.
    pub fn variables(&self, request: &CompileRequest) -> Vec<(&'static str, String)> {
        vec![
            ("source", request.source.display().to_string()),
            ("js", request.outputs.script.display().to_string()),
            ("css", request.outputs.style.display().to_string()),
            ("module", request.module_name()),
            ("component", request.name.id.clone()),
            ("format", self.format.clone()),
            ("globals", self.globals.clone()),
            ("compile_template", self.compile_template.to_string()),
        ]
    }

    /// Command line that would run for `request`.
    pub fn command_line(&self, request: &CompileRequest) -> Vec<String> {
        std::iter::once(self.command.program.clone())
            .chain(self.command.expand(&self.variables(request)))
            .collect()
    }
}

impl ComponentCompiler for ProcessCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifacts, CompileError> {
        self.command.run(&self.variables(request), &self.cwd)?;

        let script = request.outputs.script.clone();
        if !script.is_file() {
            return Err(CompileError::MissingArtifact(script));
        }

        // Components without a <style> block still get a (blank) stylesheet.
        let style = request.outputs.style.clone();
        if !style.exists() {
            fs::write(&style, "")?;
        }

        Ok(CompiledArtifacts { script, style })
    }
}
