//! Season and episode grouping for TV show files.
//!
//! The heuristics are permissive: a resolution digit may be read as an
//! episode number. Only the documented patterns are guaranteed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static SEASON_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/s(\d{1,2})/").expect("season dir regex should compile"));
static SEASON_NAMED_DIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/season\s*(\d{1,2})/").expect("season name regex should compile")
});
static SEASON_EPISODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"s(\d{1,2})e(\d{1,2})").expect("season episode regex should compile")
});
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(mp4|mkv|avi)").expect("leading number regex should compile")
});
static BARE_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"e(\d{1,2})").expect("episode regex should compile"));

/// Season number for a file, defaulting to 1.
///
/// Checks an `s<NN>` directory, a `season <NN>` directory, then an
/// `S<NN>E<MM>` token in the file name.
pub fn season_number(path: &Path) -> u16 {
    let full = path.to_string_lossy().replace('\\', "/").to_lowercase();
    let filename = file_name_lower(path);

    SEASON_DIR
        .captures(&full)
        .or_else(|| SEASON_NAMED_DIR.captures(&full))
        .and_then(|caps| caps.get(1))
        .or_else(|| SEASON_EPISODE.captures(&filename).and_then(|caps| caps.get(1)))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1)
}

/// Episode number for a file, defaulting to 1.
///
/// Checks an `S<NN>E<MM>` token, a leading `<NN>.<ext>` name, then a bare
/// `E<NN>` token.
pub fn episode_number(path: &Path) -> u16 {
    let filename = file_name_lower(path);

    SEASON_EPISODE
        .captures(&filename)
        .and_then(|caps| caps.get(2))
        .or_else(|| LEADING_NUMBER.captures(&filename).and_then(|caps| caps.get(1)))
        .or_else(|| BARE_EPISODE.captures(&filename).and_then(|caps| caps.get(1)))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1)
}

/// Partition files into seasons, keeping input order within each season.
pub fn group_by_season(paths: &[PathBuf]) -> BTreeMap<u16, Vec<PathBuf>> {
    let mut seasons: BTreeMap<u16, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        seasons
            .entry(season_number(path))
            .or_default()
            .push(path.clone());
    }
    seasons
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_patterns() {
        assert_eq!(season_number(Path::new("/tv/Show/S02/ep.mkv")), 2);
        assert_eq!(season_number(Path::new("/tv/Show/Season 3/ep.mkv")), 3);
        assert_eq!(season_number(Path::new("/tv/Show/season04/ep.mkv")), 4);
        assert_eq!(season_number(Path::new("/tv/Show/Show.S05E01.mkv")), 5);
        assert_eq!(season_number(Path::new("/tv/Show/01.mkv")), 1);
    }

    #[test]
    fn test_episode_patterns() {
        assert_eq!(episode_number(Path::new("/tv/Show/Show.S01E07.mkv")), 7);
        assert_eq!(episode_number(Path::new("/tv/Show/12.mp4")), 12);
        assert_eq!(episode_number(Path::new("/tv/Show/Show E09.mkv")), 9);
        assert_eq!(episode_number(Path::new("/tv/Show/第一集.mkv")), 1);
    }

    #[test]
    fn test_group_by_season() {
        let paths = vec![
            PathBuf::from("/tv/Show/S02/a.mkv"),
            PathBuf::from("/tv/Show/Show.S01E01.mkv"),
            PathBuf::from("/tv/Show/S02/b.mkv"),
        ];
        let groups = group_by_season(&paths);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            groups[&2],
            vec![PathBuf::from("/tv/Show/S02/a.mkv"), PathBuf::from("/tv/Show/S02/b.mkv")]
        );
    }
}
