//! Folder name generator.

use crate::models::media::{non_blank, MovieMatch, ParsedCandidate, TvShowMatch};
use crate::utils::cjk::is_cjk;

/// Country folder used when a match lists no country.
pub const UNKNOWN_COUNTRY_FOLDER: &str = "Unknown_Unknown";

/// ISO 3166-1 codes with folder-friendly country names.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United_States"),
    ("CN", "China"),
    ("JP", "Japan"),
    ("KR", "South_Korea"),
    ("GB", "United_Kingdom"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("RU", "Russia"),
    ("TW", "Taiwan"),
    ("HK", "Hong_Kong"),
    ("TH", "Thailand"),
    ("SG", "Singapore"),
];

/// Generate movie folder name.
///
/// Format: `[${primary}]-[${second}]-${year}-${imdb}-${tmdb}`, with absent
/// segments left out entirely.
pub fn generate_movie_folder(movie: &MovieMatch, parsed: Option<&ParsedCandidate>) -> String {
    let primary = primary_title(&movie.original_title, &movie.title);
    let second = second_title(
        primary,
        &[
            Some(movie.title.as_str()),
            Some(movie.original_title.as_str()),
            parsed.and_then(|p| p.original_title.as_deref()),
            parsed.and_then(|p| p.localized_title.as_deref()),
        ],
    );

    let mut name = bracketed(primary, second);
    if let Some(year) = movie.year.filter(|y| *y != 0) {
        name.push_str(&format!("-{}", year));
    }
    push_ids(&mut name, movie.imdb_id.as_deref(), &movie.tmdb_ref);
    name
}

/// Generate TV show folder name.
///
/// Format: `[${primary}]-[${second}]-${imdb}-${tmdb}`
pub fn generate_tvshow_folder(show: &TvShowMatch, parsed: Option<&ParsedCandidate>) -> String {
    let primary = primary_title(&show.original_name, &show.name);
    let second = second_title(
        primary,
        &[
            Some(show.name.as_str()),
            Some(show.original_name.as_str()),
            parsed.and_then(|p| p.original_title.as_deref()),
            parsed.and_then(|p| p.localized_title.as_deref()),
        ],
    );

    let mut name = bracketed(primary, second);
    push_ids(&mut name, show.imdb_id.as_deref(), &show.tmdb_ref);
    name
}

/// Generate season folder name.
///
/// Format: `S${season:02}-${year}`, taking the season's air year, then the
/// show's first air year, then `Unknown`.
pub fn generate_season_folder(
    season_number: u16,
    season_year: Option<&str>,
    show_year: Option<&str>,
) -> String {
    let year = non_blank(season_year)
        .or_else(|| non_blank(show_year))
        .unwrap_or("Unknown");
    format!("S{:02}-{}", season_number, year)
}

/// Country folder for the first listed ISO code.
pub fn country_folder_name(iso_code: Option<&str>) -> String {
    let Some(code) = non_blank(iso_code).map(str::trim) else {
        return UNKNOWN_COUNTRY_FOLDER.to_string();
    };
    let code = code.to_uppercase();
    let name = COUNTRY_NAMES
        .iter()
        .find(|(iso, _)| *iso == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.clone());
    format!("{}_{}", code, name)
}

/// Country folder for a movie match.
pub fn movie_country_folder(movie: &MovieMatch) -> String {
    country_folder_name(
        movie
            .production_countries
            .first()
            .map(|c| c.iso_3166_1.as_str()),
    )
}

/// Country folder for a TV show match.
pub fn tvshow_country_folder(show: &TvShowMatch) -> String {
    country_folder_name(show.origin_countries.first().map(String::as_str))
}

/// Original title, or the localized one when the original is blank.
fn primary_title<'a>(original: &'a str, localized: &'a str) -> &'a str {
    if original.trim().is_empty() {
        localized.trim()
    } else {
        original.trim()
    }
}

/// First candidate that is non-blank, differs from the primary title and is
/// written in the other script.
pub fn second_title<'a>(primary: &str, candidates: &[Option<&'a str>]) -> Option<&'a str> {
    let primary_cjk = is_cjk(primary);
    candidates
        .iter()
        .filter_map(|c| non_blank(*c).map(str::trim))
        .find(|c| *c != primary && is_cjk(c) != primary_cjk)
}

fn bracketed(primary: &str, second: Option<&str>) -> String {
    match second {
        Some(second) => format!(
            "[{}]-[{}]",
            sanitize_filename(primary),
            sanitize_filename(second)
        ),
        None => format!("[{}]", sanitize_filename(primary)),
    }
}

fn push_ids(name: &mut String, imdb_id: Option<&str>, tmdb_ref: &str) {
    if let Some(imdb) = non_blank(imdb_id).filter(|id| *id != "unknown") {
        name.push_str(&format!("-{}", imdb.trim()));
    }
    if !tmdb_ref.trim().is_empty() {
        name.push_str(&format!("-{}", tmdb_ref.trim()));
    }
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{Country, MediaKind};

    fn warfare() -> MovieMatch {
        MovieMatch {
            tmdb_id: 1241436,
            title: "战争".to_string(),
            original_title: "Warfare".to_string(),
            year: Some(2025),
            imdb_id: Some("tt31434639".to_string()),
            tmdb_ref: "1241436".to_string(),
            ..MovieMatch::default()
        }
    }

    #[test]
    fn test_generate_movie_folder() {
        let parsed = ParsedCandidate::new(MediaKind::Movie, Some("战争"), Some("Warfare"), Some(2025));
        assert_eq!(
            generate_movie_folder(&warfare(), Some(&parsed)),
            "[Warfare]-[战争]-2025-tt31434639-1241436"
        );
    }

    #[test]
    fn test_blank_ids_leave_no_hyphen() {
        let mut movie = warfare();
        movie.imdb_id = Some("  ".to_string());
        assert_eq!(generate_movie_folder(&movie, None), "[Warfare]-[战争]-2025-1241436");

        movie.imdb_id = Some("unknown".to_string());
        movie.tmdb_ref = String::new();
        movie.year = None;
        assert_eq!(generate_movie_folder(&movie, None), "[Warfare]-[战争]");
    }

    #[test]
    fn test_second_title_from_parser() {
        let movie = MovieMatch {
            title: "Warfare".to_string(),
            original_title: "Warfare".to_string(),
            tmdb_ref: "1".to_string(),
            ..MovieMatch::default()
        };
        let parsed = ParsedCandidate::new(MediaKind::Movie, Some("战争"), Some("Warfare"), None);
        assert_eq!(generate_movie_folder(&movie, Some(&parsed)), "[Warfare]-[战争]-1");
        assert_eq!(generate_movie_folder(&movie, None), "[Warfare]-1");
    }

    #[test]
    fn test_cjk_original_takes_english_second() {
        let movie = MovieMatch {
            title: "Farewell My Concubine".to_string(),
            original_title: "霸王别姬".to_string(),
            year: Some(1993),
            tmdb_ref: "10997".to_string(),
            ..MovieMatch::default()
        };
        assert_eq!(
            generate_movie_folder(&movie, None),
            "[霸王别姬]-[Farewell My Concubine]-1993-10997"
        );
    }

    #[test]
    fn test_illegal_characters_replaced() {
        let movie = MovieMatch {
            title: "碟中谍".to_string(),
            original_title: "Mission: Impossible".to_string(),
            tmdb_ref: "954".to_string(),
            ..MovieMatch::default()
        };
        assert_eq!(
            generate_movie_folder(&movie, None),
            "[Mission_ Impossible]-[碟中谍]-954"
        );
    }

    #[test]
    fn test_tvshow_folder_has_no_year() {
        let show = TvShowMatch {
            name: "庆余年".to_string(),
            original_name: "庆余年".to_string(),
            first_air_date: "2019-11-26".to_string(),
            imdb_id: Some("tt11170148".to_string()),
            tmdb_ref: "93405".to_string(),
            ..TvShowMatch::default()
        };
        let parsed = ParsedCandidate::new(MediaKind::TvShow, Some("庆余年"), Some("Joy of Life"), Some(2019));
        assert_eq!(
            generate_tvshow_folder(&show, Some(&parsed)),
            "[庆余年]-[Joy of Life]-tt11170148-93405"
        );
    }

    #[test]
    fn test_season_folder_fallbacks() {
        assert_eq!(generate_season_folder(1, Some("2024"), Some("2019")), "S01-2024");
        assert_eq!(generate_season_folder(2, None, Some("2019")), "S02-2019");
        assert_eq!(generate_season_folder(12, Some(""), None), "S12-Unknown");
    }

    #[test]
    fn test_country_folder() {
        assert_eq!(country_folder_name(Some("US")), "US_United_States");
        assert_eq!(country_folder_name(Some("hk")), "HK_Hong_Kong");
        assert_eq!(country_folder_name(Some("NZ")), "NZ_NZ");
        assert_eq!(country_folder_name(None), "Unknown_Unknown");

        let mut movie = warfare();
        movie.production_countries = vec![Country {
            iso_3166_1: "GB".to_string(),
            name: "United Kingdom".to_string(),
        }];
        assert_eq!(movie_country_folder(&movie), "GB_United_Kingdom");
        assert_eq!(tvshow_country_folder(&TvShowMatch::default()), "Unknown_Unknown");
    }

    #[test]
    fn test_names_are_stable() {
        use crate::generators::filename::{generate_episode_filename, generate_movie_filename};

        let movie = warfare();
        let parsed = ParsedCandidate::new(MediaKind::Movie, Some("战争"), Some("Warfare"), Some(2025));
        let folder = generate_movie_folder(&movie, Some(&parsed));
        assert_eq!(folder, generate_movie_folder(&movie, Some(&parsed)));
        assert_eq!(generate_movie_folder(&movie, None), generate_movie_folder(&movie, None));

        let source = "Warfare.2025.2160p.WEB-DL.x265.DDP5.1.mkv";
        assert_eq!(
            generate_movie_filename(&folder, source, ".mkv"),
            generate_movie_filename(&folder, source, ".mkv")
        );

        let show = TvShowMatch {
            name: "暗黑".to_string(),
            original_name: "Dark".to_string(),
            imdb_id: Some("tt5753856".to_string()),
            tmdb_ref: "70523".to_string(),
            ..TvShowMatch::default()
        };
        let tv_parsed = ParsedCandidate::new(MediaKind::TvShow, Some("暗黑"), Some("Dark"), None);
        assert_eq!(
            generate_tvshow_folder(&show, Some(&tv_parsed)),
            generate_tvshow_folder(&show, Some(&tv_parsed))
        );

        let episode = "Dark.S01E03.720p.WEB-DL.x265.mkv";
        assert_eq!(
            generate_episode_filename(&show, 1, 3, episode, ".mkv"),
            generate_episode_filename(&show, 1, 3, episode, ".mkv")
        );
    }
}
