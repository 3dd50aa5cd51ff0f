//! Directory scanner module.
//!
//! Walks the scan root for video files. Sample folders, bookkeeping folders
//! and trees this tool already organized are pruned, so re-runs never parse
//! organized content again.

use super::guard;
use crate::models::config::VideoConfig;
use crate::models::media::{MediaFile, MediaKind};
use crate::utils::fs::{ensure_directory, file_name_string, has_extension};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

static TV_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"s\d{1,2}e\d{1,2}|season|episode").expect("tv marker regex should compile")
});

/// Guess the media kind from a path.
pub fn detect_media_kind(path: &Path) -> MediaKind {
    let lower = path.to_string_lossy().to_lowercase();
    if TV_MARKERS.is_match(&lower) {
        MediaKind::TvShow
    } else {
        MediaKind::Movie
    }
}

fn is_sample(name: &str, config: &VideoConfig) -> bool {
    config.sample_patterns.iter().any(|p| name.contains(p.as_str()))
}

/// Whether the walk should descend into a directory below the root.
fn should_descend(entry: &DirEntry, config: &VideoConfig) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();

    if guard::is_bookkeeping_folder(&name) {
        tracing::debug!("Skipping bookkeeping folder {:?}", entry.path());
        return false;
    }
    if is_sample(&name, config) {
        tracing::debug!("Skipping sample folder {:?}", entry.path());
        return false;
    }
    if guard::looks_organized(&name) {
        tracing::debug!("Skipping organized folder {:?}", entry.path());
        return false;
    }
    true
}

/// Scan a directory for video files, sorted by path.
pub fn scan_directory(root: &Path, config: &VideoConfig) -> Result<Vec<MediaFile>> {
    ensure_directory(root)?;

    let mut files = Vec::new();
    let mut total_files = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| should_descend(e, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read directory entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        total_files += 1;

        let name = file_name_string(entry.path());
        if !has_extension(&name, &config.extensions) {
            continue;
        }
        if is_sample(&name, config) {
            tracing::debug!("Skipping sample file {:?}", entry.path());
            continue;
        }

        files.push(MediaFile {
            path: entry.path().to_path_buf(),
            media_kind: detect_media_kind(entry.path()),
            name,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        "Scanned {} files: {} videos ({} movies, {} tv)",
        total_files,
        files.len(),
        files.iter().filter(|f| f.media_kind == MediaKind::Movie).count(),
        files.iter().filter(|f| f.media_kind == MediaKind::TvShow).count()
    );

    Ok(files)
}
