//! Filename generator.
//!
//! Video characteristics are read from the original filename only; the file
//! contents are never probed.

use super::folder::sanitize_filename;
use crate::models::media::TvShowMatch;
use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_RESOLUTION: &str = "1080p";
const DEFAULT_FORMAT: &str = "WEB-DL";
const DEFAULT_CODEC: &str = "x264";
const DEFAULT_AUDIO: &str = "AAC";

/// Compile an ordered family of case-insensitive patterns.
fn family(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("video info regex should compile"))
        .collect()
}

static RESOLUTION: Lazy<Vec<Regex>> = Lazy::new(|| {
    family(&[
        r"(\d{3,4}p)",
        r"(4K)",
        r"(HD)",
        r"(UHD)",
        r"(2160p)",
        r"(1440p)",
        r"(1080p)",
        r"(720p)",
        r"(480p)",
    ])
});

static FORMAT: Lazy<Vec<Regex>> = Lazy::new(|| {
    family(&[
        r"(BluRay|Blu-ray|BD)",
        r"(WEB-DL|WEBDL|WEB)",
        r"(DVDRip|DVD)",
        r"(BRRip|BDRip)",
        r"(HDRip)",
        r"(CAM|TS|TC)",
    ])
});

static CODEC: Lazy<Vec<Regex>> =
    Lazy::new(|| family(&[r"(x264|x265|h264|h265|HEVC|AVC)", r"(DivX|XviD)", r"(VP9|AV1)"]));

static AUDIO: Lazy<Vec<Regex>> = Lazy::new(|| {
    family(&[
        r"(DTS|AC3|AAC|MP3|FLAC|DD5\.1|DDP5\.1)",
        r"(5\.1|7\.1|2\.0)",
        r"(Atmos)",
    ])
});

/// Video characteristics tagged in a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub resolution: String,
    pub format: String,
    pub codec: String,
    pub bit_depth: &'static str,
    pub audio: String,
}

impl std::fmt::Display for VideoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}-{}",
            self.resolution, self.format, self.codec, self.bit_depth, self.audio
        )
    }
}

/// First capture of the first pattern in the family that matches.
fn first_match(family: &[Regex], text: &str) -> Option<String> {
    family
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract video info from an original filename.
pub fn extract_video_info(filename: &str) -> VideoInfo {
    let lower = filename.to_lowercase();

    let resolution = if lower.contains("4k") || lower.contains("2160p") {
        "2160p".to_string()
    } else {
        first_match(&RESOLUTION, filename).unwrap_or_else(|| DEFAULT_RESOLUTION.to_string())
    };

    let ten_bit = ["10bit", "10-bit", "x265", "HEVC"]
        .iter()
        .any(|marker| filename.contains(marker));

    VideoInfo {
        resolution,
        format: first_match(&FORMAT, filename).unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        codec: first_match(&CODEC, filename).unwrap_or_else(|| DEFAULT_CODEC.to_string()),
        bit_depth: if ten_bit { "10bit" } else { "8bit" },
        audio: first_match(&AUDIO, filename).unwrap_or_else(|| DEFAULT_AUDIO.to_string()),
    }
}

/// Generate movie filename.
///
/// Format: `${folderName}-${videoInfo}${ext}`
pub fn generate_movie_filename(folder_name: &str, original_filename: &str, extension: &str) -> String {
    format!(
        "{}-{}{}",
        folder_name,
        extract_video_info(original_filename),
        extension
    )
}

/// Generate TV episode filename.
///
/// Format: `[${showOriginalName}]-S${season:02}E${episode:02}-${videoInfo}${ext}`
pub fn generate_episode_filename(
    show: &TvShowMatch,
    season: u16,
    episode: u16,
    original_filename: &str,
    extension: &str,
) -> String {
    let show_name = if show.original_name.trim().is_empty() {
        &show.name
    } else {
        &show.original_name
    };

    format!(
        "[{}]-S{:02}E{:02}-{}{}",
        sanitize_filename(show_name.trim()),
        season,
        episode,
        extract_video_info(original_filename),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_pattern_compiles() {
        assert_eq!(RESOLUTION.len(), 9);
        assert_eq!(FORMAT.len(), 6);
        assert_eq!(CODEC.len(), 3);
        assert_eq!(AUDIO.len(), 3);
    }

    #[test]
    fn test_video_info_release_name() {
        let info = extract_video_info("Kill.Command.2016.1080p.BluRay.x264-GROUP.mkv");
        assert_eq!(info.to_string(), "1080p-BluRay-x264-8bit-AAC");
    }

    #[test]
    fn test_video_info_defaults() {
        let info = extract_video_info("我的电影.mp4");
        assert_eq!(info.to_string(), "1080p-WEB-DL-x264-8bit-AAC");
    }

    #[test]
    fn test_2160p_forced() {
        // `(\d{3,4}p)` would otherwise take the 720p tag first
        let info = extract_video_info("Movie.720p.remux.of.2160p.source.mkv");
        assert_eq!(info.resolution, "2160p");

        let info = extract_video_info("Movie.4k.WEB-DL.mkv");
        assert_eq!(info.resolution, "2160p");
    }

    #[test]
    fn test_ten_bit_markers() {
        assert_eq!(extract_video_info("Show.S01E01.x265.mkv").bit_depth, "10bit");
        assert_eq!(extract_video_info("Movie.10bit.mkv").bit_depth, "10bit");
        // Case-sensitive check
        assert_eq!(extract_video_info("Movie.hevc.mkv").bit_depth, "8bit");
    }

    #[test]
    fn test_audio_families() {
        assert_eq!(extract_video_info("Movie.1080p.DDP5.1.mkv").audio, "DDP5.1");
        assert_eq!(extract_video_info("Movie.1080p.7.1.mkv").audio, "7.1");
        assert_eq!(extract_video_info("Movie.1080p.Atmos.mkv").audio, "Atmos");
    }

    #[test]
    fn test_movie_filename() {
        let name = generate_movie_filename(
            "[Warfare]-[战争]-2025-tt31434639-1241436",
            "Warfare.2025.2160p.WEB-DL.HEVC.DDP5.1.mkv",
            ".mkv",
        );
        assert_eq!(
            name,
            "[Warfare]-[战争]-2025-tt31434639-1241436-2160p-WEB-DL-HEVC-10bit-DDP5.1.mkv"
        );
    }

    #[test]
    fn test_episode_filename() {
        let show = TvShowMatch {
            name: "庆余年".to_string(),
            original_name: "Joy of Life".to_string(),
            ..TvShowMatch::default()
        };
        let name = generate_episode_filename(&show, 1, 3, "庆余年.S01E03.1080p.WEB-DL.mp4", ".mp4");
        assert_eq!(name, "[Joy of Life]-S01E03-1080p-WEB-DL-x264-8bit-AAC.mp4");
    }
}
