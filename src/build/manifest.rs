//! Manifest files.
//!
//! Each build target carries two plain-text manifests, `js.txt` and
//! `css.txt`, that the front end uses to concatenate the generated bundles.
//! A manifest starts with a marker line followed by one relative asset path
//! per line, in directory enumeration order.
//!
//! Manifests are always regenerated from a fresh scan of the output
//! directories; they are never patched. Writes go straight to the final
//! file, so a concurrent reader may observe a partially written manifest.

use crate::build::scanner::{scan_files, to_slash_path};
use std::fs;
use std::io;
use std::path::Path;

/// Kind of generated asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Bundled component script
    Script,
    /// Extracted component styles
    Style,
}

impl AssetKind {
    /// Both kinds, in the order manifests are written.
    pub const ALL: [AssetKind; 2] = [AssetKind::Script, AssetKind::Style];

    /// Subdirectory of the target directory holding this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Script => "js",
            AssetKind::Style => "css",
        }
    }

    /// File suffix of this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            AssetKind::Script => ".js",
            AssetKind::Style => ".css",
        }
    }

    /// Name of the manifest file listing this kind.
    pub fn manifest_file_name(self) -> &'static str {
        match self {
            AssetKind::Script => "js.txt",
            AssetKind::Style => "css.txt",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Script => write!(f, "script"),
            AssetKind::Style => write!(f, "style"),
        }
    }
}

/// Listing of all current assets of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Asset kind
    pub kind: AssetKind,
    /// Asset paths relative to the target directory, `/` separated
    pub entries: Vec<String>,
}

impl Manifest {
    /// Scan `<target_dir>/<kind dir>` for assets of the given kind.
    pub fn scan(target_dir: &Path, kind: AssetKind) -> io::Result<Self> {
        let asset_dir = target_dir.join(kind.dir_name());
        let entries = scan_files(target_dir, &asset_dir, kind.suffix())?
            .iter()
            .map(|p| to_slash_path(p))
            .collect();
        Ok(Self { kind, entries })
    }

    /// Render the manifest text: marker line first, no trailing newline.
    pub fn render(&self, marker: &str) -> String {
        std::iter::once(marker)
            .chain(self.entries.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of listed assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no assets are listed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of manifests written for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSet {
    /// `js.txt` contents
    pub scripts: Manifest,
    /// `css.txt` contents
    pub styles: Manifest,
}

/// Rescan the target's asset directories and overwrite both manifests.
pub fn write_manifests(target_dir: &Path, marker: &str) -> io::Result<ManifestSet> {
    let scripts = write_manifest(target_dir, AssetKind::Script, marker)?;
    let styles = write_manifest(target_dir, AssetKind::Style, marker)?;
    Ok(ManifestSet { scripts, styles })
}

/// Rescan one asset directory and overwrite its manifest.
pub fn write_manifest(target_dir: &Path, kind: AssetKind, marker: &str) -> io::Result<Manifest> {
    let manifest = Manifest::scan(target_dir, kind)?;
    fs::write(target_dir.join(kind.manifest_file_name()), manifest.render(marker))?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_marker;
    use tempfile::TempDir;

    fn create_asset(target: &Path, rel: &str) {
        let path = target.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "/* bundle */").unwrap();
    }

    fn target_with_dirs() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::create_dir_all(temp.path().join("css")).unwrap();
        temp
    }

    #[test]
    fn test_asset_kind_layout() {
        assert_eq!(AssetKind::Script.dir_name(), "js");
        assert_eq!(AssetKind::Script.suffix(), ".js");
        assert_eq!(AssetKind::Script.manifest_file_name(), "js.txt");
        assert_eq!(AssetKind::Style.dir_name(), "css");
        assert_eq!(AssetKind::Style.suffix(), ".css");
        assert_eq!(AssetKind::Style.manifest_file_name(), "css.txt");
    }

    #[test]
    fn test_render_marker_first() {
        let manifest = Manifest {
            kind: AssetKind::Script,
            entries: vec!["js/a.js".to_string(), "js/b.js".to_string()],
        };
        assert_eq!(
            manifest.render("<!-- auto generated by build -->"),
            "<!-- auto generated by build -->\njs/a.js\njs/b.js"
        );
    }

    #[test]
    fn test_render_empty_is_marker_only() {
        let manifest = Manifest { kind: AssetKind::Style, entries: vec![] };
        assert_eq!(manifest.render("# marker"), "# marker");
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_write_manifests_lists_assets() {
        let temp = target_with_dirs();
        create_asset(temp.path(), "js/formsTextfield.js");
        create_asset(temp.path(), "js/navbar.js");
        create_asset(temp.path(), "css/formsTextfield.css");
        create_asset(temp.path(), "css/notes.txt");

        let set = write_manifests(temp.path(), &default_marker()).unwrap();
        assert_eq!(set.scripts.len(), 2);
        assert_eq!(set.styles.entries, vec!["css/formsTextfield.css".to_string()]);

        let js = fs::read_to_string(temp.path().join("js.txt")).unwrap();
        let mut lines: Vec<&str> = js.lines().collect();
        assert_eq!(lines.remove(0), "<!-- auto generated by build -->");
        lines.sort();
        assert_eq!(lines, vec!["js/formsTextfield.js", "js/navbar.js"]);

        let css = fs::read_to_string(temp.path().join("css.txt")).unwrap();
        assert_eq!(css, "<!-- auto generated by build -->\ncss/formsTextfield.css");
    }

    #[test]
    fn test_write_manifests_is_idempotent() {
        let temp = target_with_dirs();
        create_asset(temp.path(), "js/a.js");
        create_asset(temp.path(), "js/nested/b.js");
        create_asset(temp.path(), "css/a.css");

        write_manifests(temp.path(), "# gen").unwrap();
        let js_first = fs::read(temp.path().join("js.txt")).unwrap();
        let css_first = fs::read(temp.path().join("css.txt")).unwrap();

        write_manifests(temp.path(), "# gen").unwrap();
        assert_eq!(fs::read(temp.path().join("js.txt")).unwrap(), js_first);
        assert_eq!(fs::read(temp.path().join("css.txt")).unwrap(), css_first);
        assert!(String::from_utf8(js_first).unwrap().starts_with("# gen\n"));
    }

    #[test]
    fn test_write_manifests_overwrites_previous() {
        let temp = target_with_dirs();
        fs::write(temp.path().join("js.txt"), "stale\ncontent\nlines").unwrap();

        write_manifests(temp.path(), "# gen").unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("js.txt")).unwrap(), "# gen");
    }

    #[test]
    fn test_write_manifests_missing_dir_errors() {
        let temp = TempDir::new().unwrap();
        assert!(write_manifests(temp.path(), "# gen").is_err());
    }
}
