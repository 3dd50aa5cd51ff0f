//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use media_shelf::core::matcher::MetadataProvider;
use media_shelf::core::parser::LanguageModel;
use media_shelf::services::tmdb::{
    MovieDetails, MovieSearchItem, SeasonDetails, TvDetails, TvSearchItem,
};
use media_shelf::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory metadata provider that records every call in order.
#[derive(Default)]
pub struct FakeProvider {
    pub movies: HashMap<String, Vec<MovieSearchItem>>,
    pub movie_details: HashMap<u64, MovieDetails>,
    pub shows: HashMap<String, Vec<TvSearchItem>>,
    pub tv_details: HashMap<u64, TvDetails>,
    pub seasons: HashMap<(u64, u16), SeasonDetails>,
    /// Every search fails with a transport error.
    pub offline: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with_movie(mut self, query: &str, item: MovieSearchItem) -> Self {
        self.movies.entry(query.to_string()).or_default().push(item);
        self
    }

    pub fn with_show(mut self, query: &str, item: TvSearchItem) -> Self {
        self.shows.entry(query.to_string()).or_default().push(item);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn year_suffix(year: Option<u16>) -> String {
    year.map(|y| format!(" [{}]", y)).unwrap_or_default()
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    async fn search_movies(&self, query: &str, year: Option<u16>) -> Result<Vec<MovieSearchItem>> {
        self.record(format!("movie:{}{}", query, year_suffix(year)));
        if self.offline {
            return Err(Error::TmdbRequest("connection refused".to_string()));
        }
        Ok(self.movies.get(query).cloned().unwrap_or_default())
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        self.record(format!("movie_details:{}", movie_id));
        self.movie_details
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| Error::TmdbRequest("404".to_string()))
    }

    async fn search_tv(&self, query: &str, year: Option<u16>) -> Result<Vec<TvSearchItem>> {
        self.record(format!("tv:{}{}", query, year_suffix(year)));
        if self.offline {
            return Err(Error::TmdbRequest("connection refused".to_string()));
        }
        Ok(self.shows.get(query).cloned().unwrap_or_default())
    }

    async fn tv_details(&self, tv_id: u64) -> Result<TvDetails> {
        self.record(format!("tv_details:{}", tv_id));
        self.tv_details
            .get(&tv_id)
            .cloned()
            .ok_or_else(|| Error::TmdbRequest("404".to_string()))
    }

    async fn season_details(&self, tv_id: u64, season_number: u16) -> Result<SeasonDetails> {
        self.record(format!("season:{}:{}", tv_id, season_number));
        self.seasons
            .get(&(tv_id, season_number))
            .cloned()
            .ok_or_else(|| Error::TmdbRequest("404".to_string()))
    }

    async fn fetch_image(&self, poster_path: &str) -> Result<Vec<u8>> {
        self.record(format!("image:{}", poster_path));
        Ok(b"poster-bytes".to_vec())
    }
}

/// Language model that answers with a canned reply for the first key found
/// in the prompt, and fails otherwise.
#[derive(Default)]
pub struct FakeModel {
    replies: Vec<(String, String)>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, key: &str, reply: &str) -> Self {
        self.replies.push((key.to_string(), reply.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| Error::LlmRequest("model unavailable".to_string()))
    }
}

pub fn movie_item(id: u64, title: &str, original_title: &str, release_date: &str) -> MovieSearchItem {
    MovieSearchItem {
        id,
        title: title.to_string(),
        original_title: original_title.to_string(),
        release_date: Some(release_date.to_string()),
        ..MovieSearchItem::default()
    }
}

pub fn show_item(id: u64, name: &str, original_name: &str, first_air_date: &str) -> TvSearchItem {
    TvSearchItem {
        id,
        name: name.to_string(),
        original_name: original_name.to_string(),
        first_air_date: Some(first_air_date.to_string()),
        ..TvSearchItem::default()
    }
}
