//! Dropped and picked path resolution.
//!
//! Turns paths handed over by a drop or a file picker into loaded `RawFile`s.
//! Directories are recursively traversed. Hidden files and known system files
//! found inside directories are skipped.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::file::RawFile;

/// System file names that should be filtered out regardless of location.
const SYSTEM_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Directory names that should be skipped during recursive traversal.
const SYSTEM_DIRS: &[&str] = &["__MACOSX"];

fn is_hidden_or_system(name: &str) -> bool {
    name.starts_with('.') || SYSTEM_FILES.contains(&name) || SYSTEM_DIRS.contains(&name)
}

fn collect_dir_contents(dir: &Path, files: &mut Vec<RawFile>) -> Result<(), AppError> {
    let mut children = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    // read_dir order is platform dependent
    children.sort();

    for child in children {
        let name = match child.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if is_hidden_or_system(name) {
            continue;
        }
        if child.is_file() {
            files.push(RawFile::from_path(&child)?);
        } else if child.is_dir() {
            collect_dir_contents(&child, files)?;
        }
    }
    Ok(())
}

/// Resolves dropped file/directory paths into loaded files.
///
/// - Regular files are returned directly, even if hidden.
/// - Directories are recursively traversed, skipping hidden and system entries.
/// - Returns an error if any path does not exist.
pub async fn resolve_dropped_paths(paths: Vec<PathBuf>) -> crate::error::Result<Vec<RawFile>> {
    tokio::task::spawn_blocking(move || resolve_paths_inner(&paths))
        .await
        .map_err(|e| AppError::Internal(format!("spawn_blocking join error: {}", e)))?
}

fn resolve_paths_inner(paths: &[PathBuf]) -> crate::error::Result<Vec<RawFile>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(AppError::Io(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
        if path.is_file() {
            files.push(RawFile::from_path(path)?);
        } else if path.is_dir() {
            collect_dir_contents(path, &mut files)?;
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(files: &[RawFile]) -> Vec<&str> {
        files.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn test_empty_paths_returns_empty() {
        let result = resolve_paths_inner(&[]);
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_single_file_path_loads_bytes_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("photo.png");
        fs::write(&file_path, "hello").unwrap();

        let files = resolve_paths_inner(&[file_path]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "photo.png");
        assert_eq!(files[0].size(), 5);
        assert_eq!(files[0].mime_type(), "image/png");
        assert_eq!(files[0].bytes(), b"hello");
    }

    #[test]
    fn test_directory_recursive_traversal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "aaa").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.txt"), "bb").unwrap();

        let files = resolve_paths_inner(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_hidden_and_system_entries_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("visible.txt"), "yes").unwrap();
        fs::write(dir.path().join(".hidden"), "no").unwrap();
        fs::write(dir.path().join(".DS_Store"), "no").unwrap();
        fs::write(dir.path().join("Thumbs.db"), "no").unwrap();
        fs::write(dir.path().join("desktop.ini"), "no").unwrap();
        let macosx = dir.path().join("__MACOSX");
        fs::create_dir(&macosx).unwrap();
        fs::write(macosx.join("junk.txt"), "junk").unwrap();

        let files = resolve_paths_inner(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(names(&files), vec!["visible.txt"]);
    }

    #[test]
    fn test_top_level_hidden_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".env");
        fs::write(&hidden, "X=1").unwrap();

        let files = resolve_paths_inner(&[hidden]).unwrap();
        assert_eq!(names(&files), vec![".env"]);
    }

    #[test]
    fn test_nonexistent_path_returns_error() {
        let result = resolve_paths_inner(&[PathBuf::from("/nonexistent/path/xyz")]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("does not exist"), "Error: {}", err);
    }

    #[test]
    fn test_is_hidden_or_system() {
        assert!(is_hidden_or_system(".hidden"));
        assert!(is_hidden_or_system(".DS_Store"));
        assert!(is_hidden_or_system("Thumbs.db"));
        assert!(is_hidden_or_system("desktop.ini"));
        assert!(is_hidden_or_system("__MACOSX"));
        assert!(!is_hidden_or_system("normal.txt"));
    }

    #[tokio::test]
    async fn test_resolve_dropped_paths_async() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.pdf"), "%PDF").unwrap();
        fs::write(dir.path().join("two.txt"), "2").unwrap();

        let files = resolve_dropped_paths(vec![dir.path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(names(&files), vec!["one.pdf", "two.txt"]);
        assert_eq!(files[0].mime_type(), "application/pdf");
    }
}
