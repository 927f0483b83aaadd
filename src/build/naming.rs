//! Component name derivation.
//!
//! A component is named after the directory that holds its source file:
//! `forms/textfield/index.vue` becomes `forms-textfield`, which in turn
//! yields the camel-case file stem `formsTextfield` and the bundle module
//! name `cmpFormsTextfield`.
//!
//! Sources that share a directory are named per file instead, so that
//! `x/a.vue` and `x/b.vue` become `x-a` and `x-b`.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Prefix of every generated bundle module name.
pub const MODULE_PREFIX: &str = "cmp";

/// Error deriving a component name from a source path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The source sits directly in the base directory
    #[error("component source '{0}' must live in a subdirectory of the source base")]
    NoParentDirectory(PathBuf),
    /// Another source already produces the same artifact names
    #[error(
        "component source '{}' would overwrite the artifacts of '{}' (both named '{}')",
        .source_path.display(),
        .claimed_by.display(),
        .camel_case
    )]
    Duplicate {
        /// Source that was rejected
        source_path: PathBuf,
        /// Source that produces the artifacts
        claimed_by: PathBuf,
        /// Shared artifact file stem
        camel_case: String,
    },
}

/// The derived identifiers of one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName {
    /// Lowercase, hyphen-joined directory path (`forms-textfield`)
    pub id: String,
    /// Camel-case identifier used for artifact file names (`formsTextfield`)
    pub camel_case: String,
    /// Camel-case identifier with an uppercase first letter (`FormsTextfield`)
    pub capitalized: String,
}

impl ComponentName {
    /// Derive the names from a source path relative to the source base.
    pub fn from_source_path(relative: &Path) -> Result<Self, NamingError> {
        Ok(Self::from_id(directory_parts(relative)?.join("-")))
    }

    /// Derive the names of a source that shares its directory with other
    /// sources: the lowercased file stem is appended to the directory parts.
    ///
    /// `x/a.vue` becomes `x-a`.
    pub fn from_shared_source_path(relative: &Path) -> Result<Self, NamingError> {
        let mut parts = directory_parts(relative)?;
        if let Some(stem) = relative.file_stem() {
            parts.push(stem.to_string_lossy().to_lowercase());
        }
        Ok(Self::from_id(parts.join("-")))
    }

    /// Build the names from an already derived identifier.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let camel_case = camel_case(&id);
        let capitalized = capitalize(&camel_case);
        Self { id, camel_case, capitalized }
    }

    /// Name of the bundle module (`cmpFormsTextfield`).
    pub fn module_name(&self) -> String {
        format!("{}{}", MODULE_PREFIX, self.capitalized)
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Lowercased directory components of a relative source path.
fn directory_parts(relative: &Path) -> Result<Vec<String>, NamingError> {
    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().to_lowercase()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if dirs.is_empty() {
        return Err(NamingError::NoParentDirectory(relative.to_path_buf()));
    }
    Ok(dirs)
}

/// Convert a hyphen/underscore/dot/space separated string to camel case.
///
/// The first word is kept lowercase; every following word gets an uppercase
/// first letter.
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let words = input
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty());

    for (i, word) in words.enumerate() {
        let word = word.to_lowercase();
        if i == 0 {
            out.push_str(&word);
        } else {
            out.push_str(&capitalize(&word));
        }
    }
    out
}

/// Uppercase the first character of a string.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
