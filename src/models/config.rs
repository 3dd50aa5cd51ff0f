//! Configuration model.
//!
//! Loaded from TOML. Every section and field has a default, so a partial file
//! (or none at all) is valid. Environment variables override the file:
//! - `TMDB_API_KEY`: TMDB v3 key or v4 bearer token
//! - `OLLAMA_HOST`: Ollama service URL
//! - `OLLAMA_MODEL`: model name
//! - `OLLAMA_TIMEOUT`: request timeout in seconds

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub tmdb: TmdbConfig,
    pub video: VideoConfig,
    pub subtitle: SubtitleConfig,
    pub prompts: PromptConfig,
    pub processing: ProcessingConfig,
    /// Directory receiving `scan_session_*.json` run summaries.
    pub sessions_dir: PathBuf,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key or bearer token.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Base URL for poster images, including the size segment.
    pub image_base_url: String,
    /// Language for responses.
    pub language: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Video file recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Extensions with leading dot.
    pub extensions: Vec<String>,
    /// Substrings marking sample files and folders.
    pub sample_patterns: Vec<String>,
}

/// Subtitle handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Extensions with leading dot.
    pub extensions: Vec<String>,
    /// Sibling folder names holding subtitles.
    pub folder_names: Vec<String>,
}

/// Prompt templates; `{filename}` is replaced with the name being parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub movie: String,
    pub tv_show: String,
}

/// Run switches, normally set from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub dry_run: bool,
    /// Nest organized folders under `<ISO>_<Country>`.
    pub country_folder: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            tmdb: TmdbConfig::default(),
            video: VideoConfig::default(),
            subtitle: SubtitleConfig::default(),
            prompts: PromptConfig::default(),
            processing: ProcessingConfig::default(),
            sessions_dir: dirs_config_path().join("sessions"),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b".to_string(),
            timeout: 300,
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            language: "zh-CN".to_string(),
            timeout: 30,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            extensions: [
                ".mkv", ".mp4", ".avi", ".mov", ".wmv", ".m4v", ".ts", ".m2ts", ".flv", ".webm",
                ".mpg", ".mpeg", ".rmvb",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            sample_patterns: vec!["sample".to_string(), "Sample".to_string(), "SAMPLE".to_string()],
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            extensions: [".srt", ".ass", ".ssa", ".sub", ".idx", ".vtt", ".sup"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            folder_names: ["Subs", "subs", "Subtitles", "subtitles", "字幕"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            movie: r#"你是一个视频文件名解析专家。请分析下面的电影文件名并提取信息。
文件名: {filename}

只返回一个JSON对象：
{"type": "movie", "title": "中文标题", "original_title": "英文或原始标题", "year": 年份, "confidence": 0.0-1.0}

要求：
- 忽略分辨率、编码、音轨、发布组等技术信息
- 续集编号（如2、II）属于标题的一部分
- 无法确定的字段设为null"#
                .to_string(),
            tv_show: r#"你是一个视频文件名解析专家。请分析下面的剧集文件夹名并提取整部剧的信息。
文件夹名: {filename}

只返回一个JSON对象：
{"type": "tv_show", "title": "中文标题", "original_title": "英文或原始标题", "year": 首播年份, "confidence": 0.0-1.0}

要求：
- 这是整部剧的信息，不是单集信息
- 文件夹名可能中英文混合，请分别提取
- 无法确定的字段设为null"#
                .to_string(),
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media_shelf")
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.trim().is_empty() {
                self.tmdb.api_key = Some(key);
            }
        }
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            self.ollama.base_url = host;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(timeout) = std::env::var("OLLAMA_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.ollama.timeout = timeout;
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and defaults otherwise. A file that cannot be read or parsed
/// is an error in both cases.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(crate::Error::PathNotFound(p.display().to_string()));
            }
            p.to_path_buf()
        }
        None => default_config_path(),
    };

    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            crate::Error::InvalidConfig {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Config::from_toml_str(&content).map_err(|e| crate::Error::InvalidConfig {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?
    } else {
        tracing::debug!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    config.apply_env();
    Ok(config)
}
