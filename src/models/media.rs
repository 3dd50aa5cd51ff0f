//! Media-related data models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Media kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    TvShow,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::TvShow => write!(f, "tv_show"),
        }
    }
}

/// A video file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without path.
    pub name: String,
    /// Kind guessed from the path.
    pub media_kind: MediaKind,
}

/// Titles and numbers extracted from a file or folder name by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCandidate {
    /// Localized title (usually Chinese).
    pub localized_title: Option<String>,
    /// Original title (usually English).
    pub original_title: Option<String>,
    /// Release or first-air year.
    pub year: Option<u16>,
    pub media_kind: MediaKind,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    pub season: Option<u16>,
    pub episode: Option<u16>,
}

impl ParsedCandidate {
    /// Create a candidate with only titles and year set.
    pub fn new(
        media_kind: MediaKind,
        localized_title: Option<&str>,
        original_title: Option<&str>,
        year: Option<u16>,
    ) -> Self {
        Self {
            localized_title: localized_title.map(str::to_string),
            original_title: original_title.map(str::to_string),
            year,
            media_kind,
            confidence: 1.0,
            season: None,
            episode: None,
        }
    }

    /// Localized title if present and not blank.
    pub fn localized(&self) -> Option<&str> {
        non_blank(self.localized_title.as_deref())
    }

    /// Original title if present and not blank.
    pub fn original(&self) -> Option<&str> {
        non_blank(self.original_title.as_deref())
    }
}

/// A production or origin country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Human readable name as reported by the provider.
    pub name: String,
}

/// TMDB match for a movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieMatch {
    /// TMDB ID.
    pub tmdb_id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Release year.
    pub year: Option<u16>,
    pub overview: String,
    /// Provider-relative poster path.
    pub poster_path: Option<String>,
    /// IMDB ID.
    pub imdb_id: Option<String>,
    /// String form of the TMDB ID.
    pub tmdb_ref: String,
    pub directors: Vec<String>,
    pub cast: Vec<String>,
    pub production_countries: Vec<Country>,
    /// Full release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    pub rating: Option<f32>,
    pub votes: Option<u32>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
}

/// TMDB match for a TV show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TvShowMatch {
    /// TMDB ID.
    pub tmdb_id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: String,
    /// First air date (YYYY-MM-DD), possibly empty.
    pub first_air_date: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub imdb_id: Option<String>,
    /// String form of the TMDB ID.
    pub tmdb_ref: String,
    pub creators: Vec<String>,
    /// ISO codes from the show's `origin_country`.
    pub origin_countries: Vec<String>,
    pub genres: Vec<String>,
    pub networks: Vec<String>,
    pub status: Option<String>,
    pub rating: Option<f32>,
    pub votes: Option<u32>,
    pub cast: Vec<String>,
}

impl TvShowMatch {
    /// First air year, if the date carries one.
    pub fn first_air_year(&self) -> Option<&str> {
        year_prefix(&self.first_air_date)
    }
}

/// TMDB season information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonMetadata {
    pub season_number: u16,
    pub name: String,
    /// Air date (YYYY-MM-DD), possibly empty.
    pub air_date: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub episode_count: usize,
}

impl SeasonMetadata {
    /// Air year, if the date carries one.
    pub fn air_year(&self) -> Option<&str> {
        year_prefix(&self.air_date)
    }
}

/// Take the leading four-digit year of a `YYYY-MM-DD` date.
pub fn year_prefix(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// Return the string if it has non-whitespace content.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_prefix() {
        assert_eq!(year_prefix("2019-11-26"), Some("2019"));
        assert_eq!(year_prefix(""), None);
        assert_eq!(year_prefix("abcd-01"), None);
    }

    #[test]
    fn test_candidate_blank_titles() {
        let parsed = ParsedCandidate::new(MediaKind::Movie, Some("  "), Some("Warfare"), None);
        assert_eq!(parsed.localized(), None);
        assert_eq!(parsed.original(), Some("Warfare"));
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Movie.to_string(), "movie");
        assert_eq!(MediaKind::TvShow.to_string(), "tv_show");
    }
}
