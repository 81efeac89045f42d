//! File scanner for indexable source trees.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::IndexConfig;

/// Enumerates indexable files under `root`.
///
/// Skips configured directory names wholesale (their subtrees are never
/// entered) and keeps only files whose extension is in the allow-list.
/// The walk is iterative, so arbitrarily deep trees do not grow the stack.
pub fn scan_files(root: &Path, cfg: &IndexConfig) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &cfg.excluded_dirs))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_allowed_extension(e.path(), &cfg.allowed_extensions))
        .map(DirEntry::into_path)
        .collect()
}

fn is_excluded_dir(entry: &DirEntry, excluded: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.iter().any(|ex| ex == name))
}

fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            allowed.iter().any(|a| *a == ext)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_config() -> IndexConfig {
        IndexConfig::new_default("http://localhost:6334", "project-code")
    }

    #[test]
    fn keeps_allowed_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package main").unwrap();
        fs::write(dir.path().join("b.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let mut files = scan_files(dir.path(), &test_config());
        files.sort();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["README.md", "a.go"]);
    }

    #[test]
    fn excluded_directories_are_never_entered() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.js"), "y").unwrap();

        let files = scan_files(dir.path(), &test_config());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.js"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Main.JAVA"), "class Main {}").unwrap();
        let files = scan_files(dir.path(), &test_config());
        assert_eq!(files.len(), 1);
    }
}
