//! File system utilities.

use crate::utils::hash;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Get the final path component as an owned string.
pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Get the extension including the leading dot (`.mkv`), or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Check if a file name ends with one of the given extensions (case insensitive).
///
/// Extensions are given with their leading dot, e.g. `.mkv`.
pub fn has_extension(filename: &str, extensions: &[String]) -> bool {
    let lower = filename.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
}

/// Return `path` if it is free, otherwise the first free `<stem>-NN<.ext>` sibling.
///
/// The counter starts at `01` and is zero-padded to two digits.
pub fn unique_destination(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = dotted_extension(path);

    let mut counter = 1u32;
    loop {
        let candidate = parent.join(format!("{}-{:02}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move a file or directory.
///
/// Tries an atomic rename first. Across filesystems, files are copied,
/// verified by SHA-256 and then removed; directories are copied recursively
/// and then removed. Returns the checksum when one was computed.
pub fn move_path(from: &Path, to: &Path) -> Result<Option<String>> {
    match fs::rename(from, to) {
        Ok(()) => return Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!("Cross-filesystem move detected, using copy+delete");
        }
        Err(e) => {
            return Err(crate::Error::MoveFailed {
                from: from.display().to_string(),
                to: to.display().to_string(),
                reason: e.to_string(),
            });
        }
    }

    if from.is_dir() {
        copy_dir_recursive(from, to)?;
        fs::remove_dir_all(from)?;
        return Ok(None);
    }

    let checksum = hash::sha256_file(from)?;
    fs::copy(from, to)?;
    if hash::sha256_file(to)? != checksum {
        let _ = fs::remove_file(to);
        return Err(crate::Error::ChecksumMismatch(to.display().to_string()));
    }
    fs::remove_file(from)?;

    Ok(Some(checksum))
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|e| crate::Error::other(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| crate::Error::other(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension() {
        let exts = vec![".mkv".to_string(), ".mp4".to_string()];
        assert!(has_extension("movie.mkv", &exts));
        assert!(has_extension("movie.MP4", &exts));
        assert!(!has_extension("movie.txt", &exts));
        assert!(!has_extension("movie.nfo", &exts));
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension(Path::new("/a/b.mkv")), ".mkv");
        assert_eq!(dotted_extension(Path::new("/a/b")), "");
    }

    #[test]
    fn test_unique_destination_free_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movie.mkv");
        assert_eq!(unique_destination(&path), path);
    }

    #[test]
    fn test_unique_destination_increments() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("movie.mkv"), "a").unwrap();
        fs::write(dir.path().join("movie-01.mkv"), "b").unwrap();

        let next = unique_destination(&dir.path().join("movie.mkv"));
        assert_eq!(next, dir.path().join("movie-02.mkv"));
    }

    #[test]
    fn test_move_path_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.mkv");
        let to = dir.path().join("b.mkv");
        fs::write(&from, "content").unwrap();

        move_path(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_move_path_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = move_path(&dir.path().join("missing"), &dir.path().join("x"));
        assert!(result.is_err());
    }
}
