//! Component sources and their output paths.

use crate::build::manifest::AssetKind;
use crate::build::naming::{ComponentName, NamingError};
use crate::build::scanner::{scan_files, to_slash_path};
use crate::build::BuildContext;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// A discovered component source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSource {
    /// Path relative to the source base directory
    pub relative: PathBuf,
    /// Resolved path of the source file
    pub path: PathBuf,
    /// Derived names, or why they could not be derived
    pub name: Result<ComponentName, NamingError>,
}

impl ComponentSource {
    /// Create a source from its path relative to `src_dir` and its derived names.
    pub fn new(src_dir: &Path, relative: PathBuf, name: Result<ComponentName, NamingError>) -> Self {
        let path = src_dir.join(&relative);
        Self { relative, path, name }
    }

    /// Identifier used in progress output and results.
    ///
    /// Falls back to the relative source path when no name could be derived.
    pub fn display_id(&self) -> String {
        match &self.name {
            Ok(name) => name.id.clone(),
            Err(_) => to_slash_path(&self.relative),
        }
    }
}

/// Where the artifacts of one component are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOutputs {
    /// `<target>/js/<camelCase>.js`
    pub script: PathBuf,
    /// `<target>/css/<camelCase>.css`
    pub style: PathBuf,
}

impl ComponentOutputs {
    /// Output paths of a component within a build context.
    pub fn for_component(ctx: &BuildContext, name: &ComponentName) -> Self {
        Self {
            script: artifact_path(ctx, AssetKind::Script, name),
            style: artifact_path(ctx, AssetKind::Style, name),
        }
    }

    /// Both paths, script first.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        vec![self.script.clone(), self.style.clone()]
    }
}

fn artifact_path(ctx: &BuildContext, kind: AssetKind, name: &ComponentName) -> PathBuf {
    ctx.asset_dir(kind).join(format!("{}{}", name.camel_case, kind.suffix()))
}

/// Find every component source under the context's source directory.
///
/// Sources are returned in slash-path order, which also decides which of
/// two colliding sources keeps its name.
pub fn discover_components(ctx: &BuildContext) -> io::Result<Vec<ComponentSource>> {
    let src_dir = ctx.src_dir();
    let mut relative = scan_files(&src_dir, &src_dir, ctx.source_suffix())?;
    relative.sort_by_cached_key(|rel| to_slash_path(rel));
    Ok(name_sources(&src_dir, relative))
}

/// Name a complete set of sources found under `src_dir`.
///
/// A source alone in its directory is named after the directory; sources
/// sharing a directory are named per file. No two returned sources write
/// the same artifacts: a source whose camelCase name is already taken gets
/// a [`NamingError::Duplicate`] naming the earlier source.
pub fn name_sources(src_dir: &Path, relative: Vec<PathBuf>) -> Vec<ComponentSource> {
    let mut per_dir: HashMap<PathBuf, usize> = HashMap::new();
    for rel in &relative {
        *per_dir.entry(parent_dir(rel)).or_default() += 1;
    }

    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    relative
        .into_iter()
        .map(|rel| {
            let name = if per_dir.get(&parent_dir(&rel)).copied().unwrap_or(0) > 1 {
                ComponentName::from_shared_source_path(&rel)
            } else {
                ComponentName::from_source_path(&rel)
            };
            let name = name.and_then(|name| match claimed.get(&name.camel_case) {
                Some(owner) => Err(NamingError::Duplicate {
                    source_path: rel.clone(),
                    claimed_by: owner.clone(),
                    camel_case: name.camel_case,
                }),
                None => {
                    claimed.insert(name.camel_case.clone(), rel.clone());
                    Ok(name)
                }
            });
            ComponentSource::new(src_dir, rel, name)
        })
        .collect()
}

fn parent_dir(relative: &Path) -> PathBuf {
    relative.parent().map(Path::to_path_buf).unwrap_or_default()
}
