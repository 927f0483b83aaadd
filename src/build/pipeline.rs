//! Build pipeline orchestration.
//!
//! The pipeline prepares the target's output directories, discovers every
//! component source, compiles them concurrently and regenerates the
//! manifests after each successful compile.

use crate::build::compiler::{CompileRequest, ComponentCompiler};
use crate::build::component::{discover_components, ComponentOutputs, ComponentSource};
use crate::build::manifest::{write_manifests, AssetKind, ManifestSet};
use crate::build::parallel::WorkerPool;
use crate::build::progress::{NullProgress, ProgressEvent, ProgressReporter, ProgressTracker};
use crate::build::result::{BuildResult, ComponentResult};
use crate::build::BuildContext;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;

/// Fatal error during build execution.
///
/// Failures of individual components are not errors; they are recorded in
/// the [`BuildResult`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// An output directory could not be created
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The source tree could not be scanned
    #[error("failed to scan component sources in {}: {source}", .path.display())]
    Discovery {
        /// Source base directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    /// Build context
    context: BuildContext,
    /// Compiler invoked once per component
    compiler: Arc<dyn ComponentCompiler>,
    /// Where progress events go
    reporter: Arc<dyn ProgressReporter>,
    /// Worker pool running the compiles
    pool: WorkerPool,
    /// Whether to do a dry run (don't actually build)
    dry_run: bool,
    /// Serializes manifest regeneration
    manifest_lock: Mutex<()>,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    ///
    /// Parallelism and fail-fast mode are taken from the `[build]` config.
    pub fn new(context: BuildContext, compiler: Arc<dyn ComponentCompiler>) -> Self {
        let build = &context.config().build;
        let pool = WorkerPool::new(build.jobs).with_fail_fast(build.fail_fast);
        Self {
            context,
            compiler,
            reporter: Arc::new(NullProgress::new()),
            pool,
            dry_run: false,
            manifest_lock: Mutex::new(()),
        }
    }

    /// Set the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set the number of parallel compiles (0 = available parallelism).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        let fail_fast = self.context.config().build.fail_fast;
        self.pool = WorkerPool::new(jobs).with_fail_fast(fail_fast);
        self
    }

    /// Set fail-fast mode (stop starting compiles after the first failure).
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.pool = self.pool.with_fail_fast(fail_fast);
        self
    }

    /// Set dry-run mode (don't actually build).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Get the build context.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Get the progress reporter.
    pub fn reporter(&self) -> &Arc<dyn ProgressReporter> {
        &self.reporter
    }

    /// Run the build pipeline.
    ///
    /// Creates the output tree, discovers sources and compiles all of them.
    /// Returns once every compile has finished.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        if !self.dry_run {
            self.prepare_output_dirs()?;
        }
        let sources = self.discover()?;
        Ok(self.compile_sources(&sources))
    }

    /// Create `<target>`, `<target>/js` and `<target>/css` if absent.
    pub fn prepare_output_dirs(&self) -> Result<(), BuildError> {
        let dirs = std::iter::once(self.context.target_dir())
            .chain(AssetKind::ALL.iter().map(|kind| self.context.asset_dir(*kind)));
        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|source| BuildError::OutputDir { path: dir, source })?;
        }
        Ok(())
    }

    /// Find every component source of the project.
    pub fn discover(&self) -> Result<Vec<ComponentSource>, BuildError> {
        discover_components(&self.context)
            .map_err(|source| BuildError::Discovery { path: self.context.src_dir(), source })
    }

    /// Compile the given sources concurrently and wait for all of them.
    pub fn compile_sources(&self, sources: &[ComponentSource]) -> BuildResult {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(sources.len());

        self.reporter.report(ProgressEvent::BuildStarted {
            target: self.context.target().to_string(),
            total_components: sources.len(),
        });

        let mut result = BuildResult::new();
        for component in self.pool.run(sources, |source| self.compile_component(source)) {
            tracker.component_completed(&component.status);
            result.add_result(component);
        }

        self.reporter.report(tracker.build_completed_event());
        result.with_duration(start.elapsed())
    }

    /// Compile one component and, on success, regenerate the manifests.
    pub fn compile_component(&self, source: &ComponentSource) -> ComponentResult {
        let start = Instant::now();
        let component_id = source.display_id();
        self.reporter.report(ProgressEvent::ComponentStarted { component_id: component_id.clone() });

        let result = match &source.name {
            Err(e) => ComponentResult::failed(component_id, e.to_string(), start.elapsed()),
            Ok(_) if self.dry_run => ComponentResult::skipped(component_id),
            Ok(name) => {
                let request = CompileRequest {
                    source: source.path.clone(),
                    name: name.clone(),
                    outputs: ComponentOutputs::for_component(&self.context, name),
                };
                match self.compiler.compile(&request) {
                    Ok(artifacts) => match self.regenerate_manifests() {
                        Ok(_) => ComponentResult::success(
                            component_id,
                            artifacts.to_vec(),
                            start.elapsed(),
                        ),
                        Err(e) => ComponentResult::failed(
                            component_id,
                            format!("failed to update manifests: {}", e),
                            start.elapsed(),
                        ),
                    },
                    Err(e) => ComponentResult::failed(component_id, e.to_string(), start.elapsed()),
                }
            }
        };

        self.reporter.report(ProgressEvent::ComponentCompleted {
            component_id: result.component_id.clone(),
            status: result.status.clone(),
            duration_ms: result.duration.as_millis() as u64,
        });
        result
    }

    /// Rewrite `js.txt` and `css.txt` from the current output directories.
    ///
    /// Regenerations never overlap, so the last one to run always lists
    /// every artifact finished before it started.
    pub fn regenerate_manifests(&self) -> io::Result<ManifestSet> {
        let _guard = self.manifest_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let set = write_manifests(&self.context.target_dir(), self.context.manifest_marker())?;
        self.reporter.report(ProgressEvent::ManifestsWritten {
            scripts: set.scripts.len(),
            styles: set.styles.len(),
        });
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::compiler::{CompileError, CompiledArtifacts};
    use crate::config::loader::default_config;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes both artifacts without any external process.
    struct StubCompiler;

    impl ComponentCompiler for StubCompiler {
        fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifacts, CompileError> {
            fs::write(&request.outputs.script, format!("var {};", request.module_name()))?;
            fs::write(&request.outputs.style, "")?;
            Ok(CompiledArtifacts {
                script: request.outputs.script.clone(),
                style: request.outputs.style.clone(),
            })
        }
    }

    /// Fails every component whose id is listed.
    struct FailingCompiler(Vec<&'static str>);

    impl ComponentCompiler for FailingCompiler {
        fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifacts, CompileError> {
            if self.0.contains(&request.name.id.as_str()) {
                return Err(CompileError::Other(format!("cannot compile {}", request.name.id)));
            }
            StubCompiler.compile(request)
        }
    }

    fn create_source(root: &Path, rel: &str) {
        let path = root.join("apps").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<template><div/></template>").unwrap();
    }

    fn context(root: &Path) -> BuildContext {
        let mut config = default_config();
        config.project.src = PathBuf::from("apps");
        config.project.out = PathBuf::from("dist");
        BuildContext::new(config, root.to_path_buf(), "site").unwrap()
    }

    fn manifest_lines(root: &Path, file: &str) -> Vec<String> {
        let text = fs::read_to_string(root.join("dist/site").join(file)).unwrap();
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_build_compiles_all_components() {
        let temp = TempDir::new().unwrap();
        create_source(temp.path(), "forms/textfield/index.vue");
        create_source(temp.path(), "navbar/template.vue");

        let pipeline = BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler));
        let result = pipeline.build().unwrap();

        assert!(result.is_success());
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.all_outputs().len(), 4);
        let script = temp.path().join("dist/site/js/formsTextfield.js");
        assert_eq!(fs::read_to_string(script).unwrap(), "var cmpFormsTextfield;");
        assert!(temp.path().join("dist/site/css/navbar.css").exists());
    }

    #[test]
    fn test_build_writes_manifests() {
        let temp = TempDir::new().unwrap();
        create_source(temp.path(), "x/a/a.vue");
        create_source(temp.path(), "x/b/b.vue");

        let pipeline = BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler));
        pipeline.build().unwrap();

        let mut js = manifest_lines(temp.path(), "js.txt");
        assert_eq!(js.remove(0), "<!-- auto generated by build -->");
        js.sort();
        assert_eq!(js, vec!["js/xA.js", "js/xB.js"]);

        let css = manifest_lines(temp.path(), "css.txt");
        assert_eq!(css.len(), 3);
    }

    #[test]
    fn test_build_isolates_failures() {
        let temp = TempDir::new().unwrap();
        create_source(temp.path(), "good/one.vue");
        create_source(temp.path(), "bad/two.vue");

        let compiler = Arc::new(FailingCompiler(vec!["bad"]));
        let pipeline = BuildPipeline::new(context(temp.path()), compiler);
        let result = pipeline.build().unwrap();

        assert!(!result.is_success());
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failures()[0].component_id, "bad");
        assert_eq!(manifest_lines(temp.path(), "js.txt")[1..], ["js/good.js".to_string()]);
    }

    #[test]
    fn test_build_rejects_source_at_base() {
        let temp = TempDir::new().unwrap();
        create_source(temp.path(), "loose.vue");

        let pipeline = BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler));
        let result = pipeline.build().unwrap();

        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.components[0].component_id, "loose.vue");
        assert!(!temp.path().join("dist/site/js.txt").exists());
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let temp = TempDir::new().unwrap();
        create_source(temp.path(), "navbar/template.vue");

        let pipeline =
            BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler)).with_dry_run(true);
        let result = pipeline.build().unwrap();

        assert!(result.is_success());
        assert_eq!(result.skipped_count(), 1);
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_prepare_output_dirs_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let pipeline = BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler));
        pipeline.prepare_output_dirs().unwrap();
        pipeline.prepare_output_dirs().unwrap();
        assert!(temp.path().join("dist/site/js").is_dir());
        assert!(temp.path().join("dist/site/css").is_dir());
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let pipeline = BuildPipeline::new(context(temp.path()), Arc::new(StubCompiler));
        let err = pipeline.build().unwrap_err();
        assert!(matches!(err, BuildError::Discovery { .. }));
    }

    #[test]
    fn test_fail_fast_with_single_job() {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c", "d"] {
            create_source(temp.path(), &format!("{}/x.vue", name));
        }

        let compiler = Arc::new(FailingCompiler(vec!["a", "b", "c", "d"]));
        let pipeline = BuildPipeline::new(context(temp.path()), compiler)
            .with_jobs(1)
            .with_fail_fast(true);
        let result = pipeline.build().unwrap();

        assert_eq!(result.components.len(), 1);
        assert_eq!(result.failed_count(), 1);
    }
}
