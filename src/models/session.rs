//! Run summary (scan session) model.
//!
//! One session is written per run as `scan_session_<id>.json`.

use super::media::{MediaKind, ParsedCandidate};
use crate::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome string used when the LLM reply held no usable JSON.
pub const PARSING_FAILED: &str = "parsing_failed";
/// Outcome string used when the LLM call itself failed.
pub const AI_API_FAILED: &str = "ai_api_failed";

/// Aggregate counters for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_files: usize,
    pub successful_parses: usize,
    pub failed_parses: usize,
    pub movies: usize,
    pub tv_shows: usize,
}

/// Parsed fields kept in the session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSummary {
    pub localized_title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<u16>,
    pub confidence: f32,
}

/// Result of one parse attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Parsed(ParsedSummary),
    Failed(String),
}

/// One parse attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRecord {
    pub filename: String,
    pub media_kind: MediaKind,
    pub folder_context: Option<String>,
    pub parsed_result: ParseOutcome,
}

/// All parse attempts of one run plus counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSession {
    pub session_id: String,
    pub timestamp: String,
    pub scan_results: Vec<ParseRecord>,
    pub summary: SessionSummary,
}

impl ScanSession {
    /// Start a session keyed by the current local time.
    pub fn new() -> Self {
        let now = Local::now();
        Self {
            session_id: now.format("%Y%m%d_%H%M%S").to_string(),
            timestamp: now.to_rfc3339(),
            scan_results: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    /// Record a successful parse.
    pub fn record_success(
        &mut self,
        filename: &str,
        folder_context: Option<&str>,
        parsed: &ParsedCandidate,
    ) {
        self.summary.successful_parses += 1;
        match parsed.media_kind {
            MediaKind::Movie => self.summary.movies += 1,
            MediaKind::TvShow => self.summary.tv_shows += 1,
        }
        self.scan_results.push(ParseRecord {
            filename: filename.to_string(),
            media_kind: parsed.media_kind,
            folder_context: folder_context.map(str::to_string),
            parsed_result: ParseOutcome::Parsed(ParsedSummary {
                localized_title: parsed.localized_title.clone(),
                original_title: parsed.original_title.clone(),
                year: parsed.year,
                confidence: parsed.confidence,
            }),
        });
    }

    /// Record a failed parse with a short reason.
    pub fn record_failure(
        &mut self,
        filename: &str,
        media_kind: MediaKind,
        folder_context: Option<&str>,
        reason: &str,
    ) {
        self.summary.failed_parses += 1;
        self.scan_results.push(ParseRecord {
            filename: filename.to_string(),
            media_kind,
            folder_context: folder_context.map(str::to_string),
            parsed_result: ParseOutcome::Failed(reason.to_string()),
        });
    }

    /// File name the session is stored under.
    pub fn file_name(&self) -> String {
        format!("scan_session_{}.json", self.session_id)
    }

    /// Write the session into `dir`, updating the total counter first.
    pub fn save(&mut self, dir: &Path) -> Result<PathBuf> {
        self.summary.total_files = self.scan_results.len();

        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        let mut file = fs::File::create(&path)?;
        file.write_all(json.as_bytes())?;

        tracing::info!("Scan session saved to {:?}", path);
        tracing::info!(
            "Session summary: total={} ok={} failed={} movies={} tv_shows={}",
            self.summary.total_files,
            self.summary.successful_parses,
            self.summary.failed_parses,
            self.summary.movies,
            self.summary.tv_shows
        );
        Ok(path)
    }

    /// Load a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counters() {
        let mut session = ScanSession::new();
        let parsed = ParsedCandidate::new(MediaKind::Movie, Some("战争"), Some("Warfare"), Some(2025));
        session.record_success("Warfare.2025.mkv", None, &parsed);
        session.record_failure("???.mkv", MediaKind::Movie, Some("misc"), PARSING_FAILED);

        assert_eq!(session.summary.successful_parses, 1);
        assert_eq!(session.summary.failed_parses, 1);
        assert_eq!(session.summary.movies, 1);
        assert_eq!(session.summary.tv_shows, 0);
        assert_eq!(session.scan_results.len(), 2);
    }

    #[test]
    fn test_failed_outcome_serializes_as_string() {
        let outcome = ParseOutcome::Failed(AI_API_FAILED.to_string());
        assert_eq!(serde_json::to_string(&outcome).unwrap(), "\"ai_api_failed\"");
    }

    #[test]
    fn test_session_id_format() {
        let session = ScanSession::new();
        assert_eq!(session.session_id.len(), 15);
        assert_eq!(&session.session_id[8..9], "_");
    }
}
