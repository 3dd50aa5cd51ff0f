//! Candidate matcher.
//!
//! Resolves a parsed title/year pair against the metadata provider through an
//! ordered list of search attempts, then enriches the first hit with detail
//! lookups.

use crate::models::media::{
    non_blank, year_prefix, Country, MovieMatch, ParsedCandidate, SeasonMetadata, TvShowMatch,
};
use crate::services::tmdb::{
    Credits, MovieDetails, MovieSearchItem, SeasonDetails, TvDetails, TvSearchItem,
};
use crate::utils::cjk::is_cjk;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Number of cast members kept on a match.
const MAX_CAST: usize = 10;

/// Regions whose alternative titles are taken as the English title.
const ENGLISH_REGIONS: &[&str] = &["US", "GB"];
/// Regions whose alternative titles and translations are taken as the Chinese title.
const CHINESE_REGIONS: &[&str] = &["CN", "TW", "HK"];

/// Raw metadata provider operations.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search_movies(&self, query: &str, year: Option<u16>) -> Result<Vec<MovieSearchItem>>;
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;
    async fn search_tv(&self, query: &str, year: Option<u16>) -> Result<Vec<TvSearchItem>>;
    async fn tv_details(&self, tv_id: u64) -> Result<TvDetails>;
    async fn season_details(&self, tv_id: u64, season_number: u16) -> Result<SeasonDetails>;
    async fn fetch_image(&self, poster_path: &str) -> Result<Vec<u8>>;
}

/// Season lookups used while organizing TV shows.
#[async_trait]
pub trait SeasonInfoProvider: Send + Sync {
    /// Season details, or `None` when unavailable.
    async fn season_info(&self, show_id: u64, season_number: u16) -> Option<SeasonMetadata>;
}

/// Poster downloads used when writing sidecars.
#[async_trait]
pub trait PosterDownloader: Send + Sync {
    /// Download a poster to `dest`. Returns whether a file was written.
    async fn download_poster(&self, poster_path: Option<&str>, dest: &Path) -> bool;
}

/// Null collaborator: no season info, no posters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

#[async_trait]
impl SeasonInfoProvider for NoMetadata {
    async fn season_info(&self, _show_id: u64, _season_number: u16) -> Option<SeasonMetadata> {
        None
    }
}

#[async_trait]
impl PosterDownloader for NoMetadata {
    async fn download_poster(&self, _poster_path: Option<&str>, _dest: &Path) -> bool {
        false
    }
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<T> {
    Found(T),
    NotFound,
    /// Every attempt failed in transport; holds the last failure.
    TransportError(String),
}

impl<T> MatchOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            MatchOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchOutcome::Found(_))
    }
}

/// One search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub query: String,
    pub year: Option<u16>,
    pub label: &'static str,
}

impl SearchAttempt {
    fn new(query: &str, year: Option<u16>, label: &'static str) -> Self {
        Self {
            query: query.trim().to_string(),
            year,
            label,
        }
    }
}

/// Ordered movie search attempts for a parsed candidate.
pub fn movie_attempts(parsed: &ParsedCandidate) -> Vec<SearchAttempt> {
    let original = parsed.original();
    let localized = parsed.localized();
    let year = parsed.year;
    let mut attempts = Vec::new();

    if let (Some(o), Some(l), Some(y)) = (original, localized, year) {
        if o != l {
            attempts.push(SearchAttempt::new(
                &format!("{} {}", o, l),
                Some(y),
                "combined titles + year",
            ));
        }
    }
    if let (Some(o), Some(y)) = (original, year) {
        attempts.push(SearchAttempt::new(o, Some(y), "original title + year"));
    }
    if let (Some(l), Some(y)) = (localized, year) {
        attempts.push(SearchAttempt::new(l, Some(y), "localized title + year"));
    }
    if let Some(o) = original {
        attempts.push(SearchAttempt::new(o, None, "original title"));
    }
    if let Some(l) = localized {
        if Some(l) != original {
            attempts.push(SearchAttempt::new(l, None, "localized title"));
        }
    }

    attempts
}

/// TV search attempts: the localized name first, then the other title.
pub fn tv_attempts(parsed: &ParsedCandidate) -> Vec<SearchAttempt> {
    let (primary, alternate) = match (parsed.localized(), parsed.original()) {
        (Some(l), o) => (Some(l), o),
        (None, o) => (o, None),
    };
    let mut attempts = Vec::new();

    if let Some(p) = primary {
        attempts.push(SearchAttempt::new(p, parsed.year, "show title + year"));
    }
    if let (Some(p), Some(a)) = (primary, alternate) {
        if p.trim() != a.trim() {
            attempts.push(SearchAttempt::new(a, parsed.year, "alternate show title + year"));
        }
    }

    attempts
}

/// Matches parsed candidates against a metadata provider.
pub struct Matcher {
    provider: Arc<dyn MetadataProvider>,
}

impl Matcher {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Search for a movie, trying each attempt in order.
    pub async fn search_movie(&self, parsed: &ParsedCandidate) -> MatchOutcome<MovieMatch> {
        let attempts = movie_attempts(parsed);
        let mut failures = 0;
        let mut last_error = String::new();

        for attempt in &attempts {
            tracing::debug!(
                "Movie search ({}): {:?} year={:?}",
                attempt.label,
                attempt.query,
                attempt.year
            );
            match self.provider.search_movies(&attempt.query, attempt.year).await {
                Ok(results) => match results.into_iter().next() {
                    Some(first) => {
                        tracing::info!(
                            "Movie match via {}: {} ({}) id={}",
                            attempt.label,
                            first.title,
                            first.original_title,
                            first.id
                        );
                        return MatchOutcome::Found(self.enrich_movie(first).await);
                    }
                    None => tracing::debug!("No results for {:?}", attempt.query),
                },
                Err(e) => {
                    tracing::warn!("Movie search {:?} failed: {}", attempt.query, e);
                    failures += 1;
                    last_error = e.to_string();
                }
            }
        }

        exhausted(attempts.len(), failures, last_error)
    }

    /// Search for a TV show.
    pub async fn search_tv_show(&self, parsed: &ParsedCandidate) -> MatchOutcome<TvShowMatch> {
        let attempts = tv_attempts(parsed);
        let mut failures = 0;
        let mut last_error = String::new();

        for attempt in &attempts {
            tracing::debug!(
                "TV search ({}): {:?} year={:?}",
                attempt.label,
                attempt.query,
                attempt.year
            );
            match self.provider.search_tv(&attempt.query, attempt.year).await {
                Ok(results) => match results.into_iter().next() {
                    Some(first) => {
                        tracing::info!(
                            "TV match via {}: {} ({}) id={}",
                            attempt.label,
                            first.name,
                            first.original_name,
                            first.id
                        );
                        return MatchOutcome::Found(self.enrich_tv_show(first).await);
                    }
                    None => tracing::debug!("No results for {:?}", attempt.query),
                },
                Err(e) => {
                    tracing::warn!("TV search {:?} failed: {}", attempt.query, e);
                    failures += 1;
                    last_error = e.to_string();
                }
            }
        }

        exhausted(attempts.len(), failures, last_error)
    }

    async fn enrich_movie(&self, item: MovieSearchItem) -> MovieMatch {
        let mut result = MovieMatch {
            tmdb_id: item.id,
            title: item.title,
            original_title: item.original_title,
            year: item.release_date.as_deref().and_then(parse_year),
            overview: item.overview.unwrap_or_default(),
            poster_path: item.poster_path.filter(|p| !p.is_empty()),
            tmdb_ref: item.id.to_string(),
            release_date: item.release_date.filter(|d| !d.is_empty()),
            rating: item.vote_average,
            votes: item.vote_count,
            ..MovieMatch::default()
        };

        let details = match self.provider.movie_details(item.id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!("Movie details for {} unavailable: {}", item.id, e);
                return result;
            }
        };

        result.imdb_id = details.imdb_id.clone().filter(|id| !id.trim().is_empty());
        if result.imdb_id.is_none() {
            tracing::warn!("No IMDB id for movie {}", item.id);
        }
        if let Some(credits) = &details.credits {
            result.directors = directors(credits);
            result.cast = top_cast(credits);
        }
        result.production_countries = details
            .production_countries
            .iter()
            .map(|c| Country {
                iso_3166_1: c.iso_3166_1.clone(),
                name: c.name.clone(),
            })
            .collect();
        result.genres = details.genres.iter().map(|g| g.name.clone()).collect();
        result.studios = details
            .production_companies
            .iter()
            .map(|c| c.name.clone())
            .collect();
        if details.runtime.is_some() {
            result.runtime = details.runtime;
        }
        if details.vote_average.is_some() {
            result.rating = details.vote_average;
        }
        if details.vote_count.is_some() {
            result.votes = details.vote_count;
        }
        if result.overview.is_empty() {
            result.overview = details.overview.clone().unwrap_or_default();
        }

        if let Some(title) = alternate_title(&details) {
            tracing::debug!("Using alternate title {:?} for movie {}", title, item.id);
            result.title = title;
        }

        result
    }

    async fn enrich_tv_show(&self, item: TvSearchItem) -> TvShowMatch {
        let mut result = TvShowMatch {
            tmdb_id: item.id,
            name: item.name,
            original_name: item.original_name,
            first_air_date: item.first_air_date.unwrap_or_default(),
            overview: item.overview.unwrap_or_default(),
            poster_path: item.poster_path.filter(|p| !p.is_empty()),
            tmdb_ref: item.id.to_string(),
            origin_countries: item.origin_country,
            ..TvShowMatch::default()
        };

        let details = match self.provider.tv_details(item.id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!("TV details for {} unavailable: {}", item.id, e);
                return result;
            }
        };

        result.imdb_id = details
            .external_ids
            .as_ref()
            .and_then(|ids| ids.imdb_id.clone())
            .filter(|id| !id.trim().is_empty());
        if result.imdb_id.is_none() {
            tracing::warn!("No IMDB id for TV show {}", item.id);
        }
        if !details.origin_country.is_empty() {
            result.origin_countries = details.origin_country.clone();
        }
        result.creators = details.created_by.iter().map(|c| c.name.clone()).collect();
        result.genres = details.genres.iter().map(|g| g.name.clone()).collect();
        result.networks = details.networks.iter().map(|n| n.name.clone()).collect();
        result.status = details.status.clone().filter(|s| !s.is_empty());
        result.rating = details.vote_average;
        result.votes = details.vote_count;
        if let Some(credits) = &details.credits {
            result.cast = top_cast(credits);
        }
        if result.overview.is_empty() {
            result.overview = details.overview.clone().unwrap_or_default();
        }

        result
    }
}

#[async_trait]
impl SeasonInfoProvider for Matcher {
    async fn season_info(&self, show_id: u64, season_number: u16) -> Option<SeasonMetadata> {
        match self.provider.season_details(show_id, season_number).await {
            Ok(details) => Some(SeasonMetadata {
                season_number,
                name: details.name,
                air_date: details.air_date.unwrap_or_default(),
                overview: details.overview.unwrap_or_default(),
                poster_path: details.poster_path.filter(|p| !p.is_empty()),
                episode_count: details.episodes.len(),
            }),
            Err(e) => {
                tracing::warn!(
                    "Season {} of show {} unavailable: {}",
                    season_number,
                    show_id,
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl PosterDownloader for Matcher {
    async fn download_poster(&self, poster_path: Option<&str>, dest: &Path) -> bool {
        let Some(poster_path) = non_blank(poster_path) else {
            return false;
        };

        let bytes = match self.provider.fetch_image(poster_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Poster {} download failed: {}", poster_path, e);
                return false;
            }
        };

        if let Some(parent) = dest.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!("Cannot create {:?}: {}", parent, e);
                return false;
            }
        }
        match tokio::fs::write(dest, &bytes).await {
            Ok(()) => {
                tracing::info!("Poster saved to {:?}", dest);
                true
            }
            Err(e) => {
                tracing::warn!("Cannot write poster {:?}: {}", dest, e);
                false
            }
        }
    }
}

fn exhausted<T>(attempts: usize, failures: usize, last_error: String) -> MatchOutcome<T> {
    if attempts > 0 && failures == attempts {
        MatchOutcome::TransportError(last_error)
    } else {
        MatchOutcome::NotFound
    }
}

fn parse_year(date: &str) -> Option<u16> {
    year_prefix(date).and_then(|y| y.parse().ok())
}

fn directors(credits: &Credits) -> Vec<String> {
    credits
        .crew
        .iter()
        .filter(|c| c.job == "Director")
        .map(|c| c.name.clone())
        .collect()
}

fn top_cast(credits: &Credits) -> Vec<String> {
    credits
        .cast
        .iter()
        .take(MAX_CAST)
        .map(|c| c.name.clone())
        .collect()
}

/// Pick the title in the script opposite to the original title.
///
/// A CJK original takes the first US/GB non-CJK alternative title. Otherwise
/// the first CN/TW/HK CJK alternative title is taken, then the first CN/TW/HK
/// translation with a CJK title.
pub fn alternate_title(details: &MovieDetails) -> Option<String> {
    let titles = details
        .alternative_titles
        .as_ref()
        .map(|a| a.titles.as_slice())
        .unwrap_or_default();

    if is_cjk(&details.original_title) {
        return titles
            .iter()
            .find(|t| {
                ENGLISH_REGIONS.contains(&t.iso_3166_1.as_str())
                    && !t.title.trim().is_empty()
                    && !is_cjk(&t.title)
            })
            .map(|t| t.title.clone());
    }

    titles
        .iter()
        .find(|t| CHINESE_REGIONS.contains(&t.iso_3166_1.as_str()) && is_cjk(&t.title))
        .map(|t| t.title.clone())
        .or_else(|| {
            details
                .translations
                .as_ref()?
                .translations
                .iter()
                .filter(|t| CHINESE_REGIONS.contains(&t.iso_3166_1.as_str()))
                .filter_map(|t| t.data.title.as_deref())
                .find(|title| is_cjk(title))
                .map(str::to_string)
        })
}
