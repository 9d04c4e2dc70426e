//! Input discovery: deterministic recursive walk of the content tree

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// One input file scheduled for transformation.
#[derive(Debug, Clone)]
pub struct DiscoveredAsset {
    /// Absolute (or caller-relative) path on disk
    pub path: PathBuf,
    /// Name relative to the input root, '/'-separated; this is what the
    /// manifest reports as `original_name`
    pub original_name: String,
}

/// Collect all files under `root` recursively, respecting exclude patterns.
///
/// Output is sorted by path so batch order (and therefore manifest order)
/// is stable across runs. Exclude patterns are glob-matched against file
/// and directory names, not full paths.
pub fn discover_assets(root: &Path, exclude_patterns: &[String]) -> Result<Vec<DiscoveredAsset>> {
    let excludes: Vec<glob::Pattern> = exclude_patterns
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let mut files = Vec::new();
    collect_inner(root, &mut files, &excludes)?;
    files.sort(); // deterministic order

    Ok(files
        .into_iter()
        .map(|path| {
            let original_name = relative_name(root, &path);
            DiscoveredAsset {
                path,
                original_name,
            }
        })
        .collect())
}

fn collect_inner(dir: &Path, out: &mut Vec<PathBuf>, excludes: &[glob::Pattern]) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading dir: {}", dir.display()))?
    {
        let entry = entry.context("reading dir entry")?;
        let path = entry.path();
        let file_type = entry.file_type().context("stat dir entry")?;

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if excludes.iter().any(|p| p.matches(name)) {
                continue;
            }
        }

        if file_type.is_dir() {
            collect_inner(&path, out, excludes)?;
        } else {
            // Regular files and symlinks both; a broken symlink surfaces
            // as a per-file read failure, not a discovery abort.
            out.push(path);
        }
    }
    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, rel.as_bytes()).unwrap();
    }

    #[test]
    fn finds_nested_files_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.txt");
        touch(tmp.path(), "a/inner.md");
        touch(tmp.path(), "a/zz.md");

        let assets = discover_assets(tmp.path(), &[]).unwrap();
        let names: Vec<_> = assets.iter().map(|a| a.original_name.as_str()).collect();
        assert_eq!(names, vec!["a/inner.md", "a/zz.md", "b.txt"]);
    }

    #[test]
    fn exclude_patterns_filter_by_name() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "keep.txt");
        touch(tmp.path(), "drop.tmp");
        touch(tmp.path(), "skipdir/also-dropped.txt");

        let assets =
            discover_assets(tmp.path(), &["*.tmp".to_string(), "skipdir".to_string()]).unwrap();
        let names: Vec<_> = assets.iter().map(|a| a.original_name.as_str()).collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[test]
    fn empty_root_yields_no_assets() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_assets(tmp.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_assets(&tmp.path().join("absent"), &[]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_still_discovered() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "real.txt");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("dangling.txt"))
            .unwrap();

        let assets = discover_assets(tmp.path(), &[]).unwrap();
        let names: Vec<_> = assets.iter().map(|a| a.original_name.as_str()).collect();
        assert_eq!(names, vec!["dangling.txt", "real.txt"]);
    }
}
