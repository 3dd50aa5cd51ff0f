//! Filename parser module using AI.
//!
//! Asks the language model to extract titles and year from a file or folder
//! name, pulls the first JSON object out of the free-form reply and validates
//! it into a [`ParsedCandidate`]. Every attempt is recorded in the session.

use crate::models::config::PromptConfig;
use crate::models::media::{MediaKind, ParsedCandidate};
use crate::models::session::{ScanSession, AI_API_FAILED, PARSING_FAILED};
use crate::Result;
use async_trait::async_trait;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?```").expect("valid regex"));

/// A text-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt, returning the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Filename parser backed by a language model.
pub struct FilenameParser {
    model: Arc<dyn LanguageModel>,
    prompts: PromptConfig,
}

impl FilenameParser {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: PromptConfig) -> Self {
        Self { model, prompts }
    }

    /// Prompt for a movie file, optionally with its parent folder name.
    pub fn movie_prompt(&self, filename: &str, folder_context: Option<&str>) -> String {
        match folder_context {
            Some(folder) => format!(
                r#"你是一个视频文件名解析专家。请结合文件夹名分析下面的电影文件。

文件夹名: {folder}
文件名: {filename}

文件夹名通常包含更完整的标题和年份信息，文件名可能只是简写。

只返回一个JSON对象：
{{"type": "movie", "title": "中文标题", "original_title": "英文或原始标题", "year": 年份, "confidence": 0.0-1.0}}

要求：
- 忽略分辨率、编码、音轨、发布组等技术信息
- 续集编号（如2、II）属于标题的一部分
- 无法确定的字段设为null"#
            ),
            None => self.prompts.movie.replace("{filename}", filename),
        }
    }

    /// Prompt for a TV show folder.
    pub fn tv_prompt(&self, folder_name: &str) -> String {
        self.prompts.tv_show.replace("{filename}", folder_name)
    }

    /// Parse a movie file name.
    pub async fn parse_movie(
        &self,
        filename: &str,
        folder_context: Option<&str>,
        session: &mut ScanSession,
    ) -> Option<ParsedCandidate> {
        let prompt = self.movie_prompt(filename, folder_context);
        self.parse(filename, folder_context, MediaKind::Movie, &prompt, session)
            .await
    }

    /// Parse a TV show folder name.
    pub async fn parse_tv_show(
        &self,
        folder_name: &str,
        session: &mut ScanSession,
    ) -> Option<ParsedCandidate> {
        let prompt = self.tv_prompt(folder_name);
        self.parse(folder_name, None, MediaKind::TvShow, &prompt, session)
            .await
    }

    async fn parse(
        &self,
        name: &str,
        folder_context: Option<&str>,
        media_kind: MediaKind,
        prompt: &str,
        session: &mut ScanSession,
    ) -> Option<ParsedCandidate> {
        tracing::info!("AI parsing {}: {}", media_kind, name);
        let start = std::time::Instant::now();

        let reply = match self.model.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("AI request for {:?} failed: {}", name, e);
                session.record_failure(name, media_kind, folder_context, AI_API_FAILED);
                return None;
            }
        };
        tracing::debug!(
            "AI reply after {:.1}s: {}",
            start.elapsed().as_secs_f32(),
            reply
        );

        match extract_json(&reply).and_then(|v| candidate_from_json(&v, media_kind)) {
            Some(parsed) => {
                tracing::info!(
                    "Parsed {:?}: title={:?} original={:?} year={:?} confidence={:.2}",
                    name,
                    parsed.localized_title,
                    parsed.original_title,
                    parsed.year,
                    parsed.confidence
                );
                session.record_success(name, folder_context, &parsed);
                Some(parsed)
            }
            None => {
                tracing::warn!("No usable JSON in AI reply for {:?}", name);
                session.record_failure(name, media_kind, folder_context, PARSING_FAILED);
                None
            }
        }
    }
}

/// Extract the first JSON object from a model reply.
///
/// Tries the whole reply, then the first fenced code block, then each
/// balanced `{...}` span in order.
pub fn extract_json(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();
    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    if let Some(block) = FENCED_BLOCK.captures(trimmed).and_then(|c| c.get(1)) {
        if let Some(value) = parse_object(block.as_str().trim()) {
            return Some(value);
        }
    }

    let bytes = trimmed.as_bytes();
    for (start, _) in trimmed.match_indices('{') {
        if let Some(end) = balanced_end(bytes, start) {
            if let Some(value) = parse_object(&trimmed[start..=end]) {
                return Some(value);
            }
        }
    }

    None
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Index of the brace closing the one at `start`, skipping string contents.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Validate a reply object into a candidate.
///
/// Returns `None` when neither title survives validation.
pub fn candidate_from_json(value: &Value, media_kind: MediaKind) -> Option<ParsedCandidate> {
    let localized_title = text_field(value, "title");
    let original_title = text_field(value, "original_title");
    if localized_title.is_none() && original_title.is_none() {
        return None;
    }

    let raw_confidence = value
        .get("confidence")
        .and_then(number_field)
        .unwrap_or(0.5) as f32;
    // Models sometimes answer on a 0-100 scale
    let confidence = if raw_confidence > 1.0 {
        raw_confidence / 100.0
    } else {
        raw_confidence
    }
    .clamp(0.0, 1.0);

    let current_year = chrono::Local::now().year();
    let year = value
        .get("year")
        .and_then(number_field)
        .map(|y| y as i64)
        .filter(|y| *y >= 1900 && *y <= i64::from(current_year) + 5)
        .map(|y| y as u16);

    let season = value
        .get("season")
        .and_then(number_field)
        .map(|n| n as i64)
        .filter(|n| (1..=100).contains(n))
        .map(|n| n as u16);
    let episode = value
        .get("episode")
        .and_then(number_field)
        .map(|n| n as i64)
        .filter(|n| (1..=1000).contains(n))
        .map(|n| n as u16);

    Some(ParsedCandidate {
        localized_title,
        original_title,
        year,
        media_kind,
        confidence,
        season,
        episode,
    })
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(str::to_string)
}

/// Numbers arrive either as JSON numbers or numeric strings.
fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
