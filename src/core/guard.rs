//! Recognizers for folders this tool already produced.

use once_cell::sync::Lazy;
use regex::Regex;

/// `[title]` or `[title]-[title]`, optional year, optional IMDB token, trailing TMDB id.
static ORGANIZED_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[.*\](-\[.*\])?(-\d{4})?(-(tt\d+|unknown))?-\d+$")
        .expect("organized folder regex should compile")
});

static COUNTRY_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2,3}_[A-Za-z_]+$").expect("country folder regex should compile")
});

/// Names of the bookkeeping folders created under a scan root.
pub const UNMATCHED_DIR: &str = "Unmatched";
pub const UNWANTED_DIR: &str = "Unwanted";

/// Whether a folder name has the canonical organized shape.
pub fn looks_organized(name: &str) -> bool {
    ORGANIZED_FOLDER.is_match(name)
}

/// Whether a folder name is a `<ISO>_<Country>` segment.
pub fn looks_like_country_folder(name: &str) -> bool {
    COUNTRY_FOLDER.is_match(name)
}

/// Whether a folder name is one of the bookkeeping folders.
pub fn is_bookkeeping_folder(name: &str) -> bool {
    name == UNMATCHED_DIR || name == UNWANTED_DIR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organized_shapes() {
        assert!(looks_organized("[Foo]-[Bar]-2020-tt1234567-999"));
        assert!(looks_organized("[Warfare]-[战争]-2025-tt31434639-1241436"));
        assert!(looks_organized("[Warfare]-[战争]-2025-1241436"));
        assert!(looks_organized("[Warfare]-2025-unknown-1241436"));
        assert!(looks_organized("[庆余年]-[Joy of Life]-tt11170148-93405"));
        assert!(looks_organized("[Dark]-70523"));
    }

    #[test]
    fn test_not_organized() {
        assert!(!looks_organized("Warfare.2025.1080p.WEB-DL"));
        assert!(!looks_organized("[Foo]-[Bar]-2020-tt1234567"));
        assert!(!looks_organized("S01-2019"));
    }

    #[test]
    fn test_country_folder() {
        assert!(looks_like_country_folder("US_United_States"));
        assert!(looks_like_country_folder("NZ_NZ"));
        // The fallback segment is kept by the Unwanted pass separately
        assert!(!looks_like_country_folder("Unknown_Unknown"));
        assert!(!looks_like_country_folder("us_united_states"));
        assert!(!looks_like_country_folder("USA-Movies"));
    }
}
