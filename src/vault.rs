//! Filesystem helpers shared by the tag normalizer and the index generator.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, VaultError};

/// Atomic file write: write to a temp file in the same directory, then rename.
/// A sync client watching the vault never sees a half-written note.
pub fn atomic_write_file(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = path.with_file_name(format!("{}.coursevault-tmp", file_name));

    let mut file = fs::File::create(&temp_path).map_err(|e| VaultError::io(&temp_path, e))?;
    file.write_all(content)
        .map_err(|e| VaultError::io(&temp_path, e))?;
    file.sync_all().map_err(|e| VaultError::io(&temp_path, e))?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(VaultError::io(path, e));
    }

    Ok(())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Hidden folders and the templates folder are never traversed. The walk
/// root itself is always kept.
pub fn is_traversable(entry: &DirEntry, templates_dir: &str) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if !entry.file_type().is_dir() {
        return !is_hidden(&name);
    }
    !is_hidden(&name) && name != templates_dir
}

/// Every markdown file under `root`, sorted by path. Walk errors (unreadable
/// folders) are returned alongside so callers can count them and move on.
pub fn collect_md_files(root: &Path, templates_dir: &str) -> (Vec<PathBuf>, Vec<VaultError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| is_traversable(e, templates_dir));

    for entry in walker {
        match entry {
            Ok(entry) => {
                let is_md = entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("md"))
                    .unwrap_or(false);
                if entry.file_type().is_file() && is_md {
                    files.push(entry.into_path());
                }
            }
            Err(e) => errors.push(VaultError::Walk(e)),
        }
    }

    (files, errors)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| VaultError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("note.md");
        fs::write(&path, "old").unwrap();

        atomic_write_file(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp_dir.path().join("note.md.coursevault-tmp").exists());
    }

    #[test]
    fn test_collect_md_files_skips_hidden_and_templates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".obsidian")).unwrap();
        fs::create_dir_all(root.join("_templates")).unwrap();
        fs::create_dir_all(root.join("Course")).unwrap();
        fs::write(root.join(".obsidian/workspace.md"), "x").unwrap();
        fs::write(root.join("_templates/index-template.md"), "x").unwrap();
        fs::write(root.join("Course/a.md"), "x").unwrap();
        fs::write(root.join("Course/b.MD"), "x").unwrap();
        fs::write(root.join("Course/c.pdf"), "x").unwrap();
        fs::write(root.join("Course/.hidden.md"), "x").unwrap();

        let (files, errors) = collect_md_files(root, "_templates");

        assert!(errors.is_empty());
        assert_eq!(
            files,
            vec![root.join("Course/a.md"), root.join("Course/b.MD")]
        );
    }
}
