//! Recursive file scanning.
//!
//! Walks a directory tree and collects every file whose name ends with a
//! given suffix. Paths are returned relative to a base directory, in the
//! order the file system enumerates them.
//!
//! Symlinked directories are followed and there is no cycle detection, so a
//! link pointing back up the tree makes the scan recurse until the OS
//! rejects the path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Collect all files under `dir` whose file name ends with `suffix`.
///
/// Every returned path is relative to `base`. Directories are always
/// descended into, whether or not their own name matches, and never appear
/// in the result.
///
/// # Errors
/// Returns the first I/O error hit while listing a directory or reading
/// an entry's metadata.
pub fn scan_files(base: &Path, dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    scan_into(base, dir, suffix, &mut found)?;
    Ok(found)
}

fn scan_into(base: &Path, dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Follows symlinks.
        if fs::metadata(&path)?.is_dir() {
            scan_into(base, &path, suffix, found)?;
            continue;
        }

        if entry.file_name().to_string_lossy().ends_with(suffix) {
            found.push(relative_to(base, &path));
        }
    }
    Ok(())
}

fn relative_to(base: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(base).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
