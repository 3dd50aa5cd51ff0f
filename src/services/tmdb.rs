//! TMDB API client.
//!
//! Every response field is optional on the wire; missing fields deserialize
//! to their defaults instead of failing the whole response.

use crate::core::matcher::MetadataProvider;
use crate::models::config::TmdbConfig;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// TMDB API client.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
    /// Whether to use Bearer token authentication (API v4 style)
    use_bearer: bool,
    client: reqwest::Client,
}

/// Movie search result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieSearchResult {
    pub results: Vec<MovieSearchItem>,
}

/// Movie search item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieSearchItem {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_count: Option<u32>,
    pub vote_average: Option<f32>,
}

/// Movie details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    pub id: u64,
    pub imdb_id: Option<String>,
    pub title: String,
    pub original_title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f32>,
    pub vote_count: Option<u32>,
    pub poster_path: Option<String>,
    pub genres: Vec<NamedItem>,
    pub production_countries: Vec<ProductionCountry>,
    pub production_companies: Vec<NamedItem>,
    pub credits: Option<Credits>,
    pub alternative_titles: Option<AlternativeTitles>,
    pub translations: Option<Translations>,
}

/// Anything TMDB lists as `{id, name}`: genres, companies, networks, creators.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedItem {
    pub id: u64,
    pub name: String,
}

/// Production country.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

/// Alternative titles container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlternativeTitles {
    pub titles: Vec<AlternativeTitle>,
}

/// Alternative title by region.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlternativeTitle {
    pub iso_3166_1: String,
    pub title: String,
}

/// Translations container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Translations {
    pub translations: Vec<Translation>,
}

/// Translation by region.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub iso_3166_1: String,
    pub data: TranslationData,
}

/// Translated fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslationData {
    /// Movies carry `title`.
    pub title: Option<String>,
    /// Shows carry `name`.
    pub name: Option<String>,
}

/// TV show search result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TvSearchResult {
    pub results: Vec<TvSearchItem>,
}

/// TV show search item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TvSearchItem {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub origin_country: Vec<String>,
}

/// TV show details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TvDetails {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub status: Option<String>,
    pub vote_average: Option<f32>,
    pub vote_count: Option<u32>,
    pub origin_country: Vec<String>,
    pub genres: Vec<NamedItem>,
    pub networks: Vec<NamedItem>,
    pub created_by: Vec<NamedItem>,
    pub credits: Option<Credits>,
    pub external_ids: Option<ExternalIds>,
}

/// External IDs for a TV show.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
    pub tvdb_id: Option<u64>,
}

/// Season details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub season_number: u16,
    pub air_date: Option<String>,
    pub episodes: Vec<EpisodeInfo>,
}

/// Episode info within a season.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EpisodeInfo {
    pub id: u64,
    pub name: String,
    pub episode_number: u16,
    pub air_date: Option<String>,
}

/// Movie/TV credits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

/// Cast member.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub order: Option<u32>,
}

/// Crew member.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
    pub department: String,
}

impl TmdbClient {
    /// Create a new TMDB client. Fails if no API key is configured.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(crate::Error::TmdbApiKeyMissing)?;

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            use_bearer,
            client,
        })
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.use_bearer {
            format!(
                "{}/{}?language={}{}",
                self.base_url, path, self.language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                self.base_url, path, self.api_key, self.language, extra_params
            )
        }
    }

    /// GET a JSON document, treating non-2xx statuses as errors.
    ///
    /// The URL is stripped from errors since it may carry the API key.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .build_request(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?;
        resp.json().await.map_err(request_error)
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.use_bearer {
            format!("{}/authentication", self.base_url)
        } else {
            format!("{}/authentication?api_key={}", self.base_url, self.api_key)
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get poster image URL.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }
}

fn request_error(e: reqwest::Error) -> crate::Error {
    crate::Error::TmdbRequest(e.without_url().to_string())
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_movies(&self, query: &str, year: Option<u16>) -> Result<Vec<MovieSearchItem>> {
        let year_param = year.map(|y| format!("&year={}", y)).unwrap_or_default();
        let url = self.build_url(
            "search/movie",
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: MovieSearchResult = self.get_json(&url).await?;
        Ok(resp.results)
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let url = self.build_url(
            &format!("movie/{}", movie_id),
            "&append_to_response=alternative_titles,translations,credits",
        );
        self.get_json(&url).await
    }

    async fn search_tv(&self, query: &str, year: Option<u16>) -> Result<Vec<TvSearchItem>> {
        let year_param = year
            .map(|y| format!("&first_air_date_year={}", y))
            .unwrap_or_default();
        let url = self.build_url(
            "search/tv",
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: TvSearchResult = self.get_json(&url).await?;
        Ok(resp.results)
    }

    async fn tv_details(&self, tv_id: u64) -> Result<TvDetails> {
        let url = self.build_url(
            &format!("tv/{}", tv_id),
            "&append_to_response=external_ids,credits",
        );
        self.get_json(&url).await
    }

    async fn season_details(&self, tv_id: u64, season_number: u16) -> Result<SeasonDetails> {
        let url = self.build_url(&format!("tv/{}/season/{}", tv_id, season_number), "");
        self.get_json(&url).await
    }

    async fn fetch_image(&self, poster_path: &str) -> Result<Vec<u8>> {
        let url = self.poster_url(poster_path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?;
        let bytes = resp.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}
