//! Moves matched media into the library layout.
//!
//! Movies land in `<root>[/<country>]/<movie folder>/<movie file>`, episodes
//! in `<root>[/<country>]/<show folder>/S<NN>-<year>/<episode file>`. Related
//! subtitles follow their video, and sidecars are written next to them in
//! live mode unless already present.

use super::executor::Executor;
use super::grouper::{episode_number, group_by_season};
use super::guard::{self, UNMATCHED_DIR, UNWANTED_DIR};
use super::matcher::{NoMetadata, PosterDownloader, SeasonInfoProvider};
use crate::generators::filename::{generate_episode_filename, generate_movie_filename};
use crate::generators::folder::{
    generate_movie_folder, generate_season_folder, generate_tvshow_folder, movie_country_folder,
    tvshow_country_folder, UNKNOWN_COUNTRY_FOLDER,
};
use crate::generators::nfo::{generate_movie_nfo, generate_season_nfo};
use crate::models::config::SubtitleConfig;
use crate::models::media::{MovieMatch, ParsedCandidate, TvShowMatch};
use crate::models::plan::{PlannedOperation, RunContext};
use crate::utils::fs::{dotted_extension, file_name_string, has_extension};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MOVIE_NFO: &str = "media_info.nfo";
const SEASON_NFO: &str = "season.nfo";
const POSTER: &str = "poster.jpg";

static QUALITY_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(1080p|720p|480p|4k|2160p|bluray|webrip|hdtv|x264|x265|h264|h265)\b")
        .expect("quality token regex should compile")
});
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.\-_\[\]()]").expect("separator regex should compile"));

/// Lowercase a stem, drop quality tokens and turn separators into single spaces.
pub fn clean_stem(stem: &str) -> String {
    let lower = stem.to_lowercase();
    let stripped = QUALITY_TOKENS.replace_all(&lower, "");
    let spaced = SEPARATORS.replace_all(&stripped, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a subtitle stem belongs to a video stem.
///
/// Related when one cleaned stem contains the other or they share at least
/// two words.
pub fn is_related_subtitle(video_stem: &str, subtitle_stem: &str) -> bool {
    let video = clean_stem(video_stem);
    let subtitle = clean_stem(subtitle_stem);
    if video.is_empty() || subtitle.is_empty() {
        return false;
    }
    if video.contains(&subtitle) || subtitle.contains(&video) {
        return true;
    }

    let video_words: HashSet<&str> = video.split(' ').collect();
    let subtitle_words: HashSet<&str> = subtitle.split(' ').collect();
    video_words.intersection(&subtitle_words).count() >= 2
}

/// Organizes matched items for one run.
pub struct Organizer {
    executor: Executor,
    subtitle: SubtitleConfig,
    country_folder: bool,
    seasons: Arc<dyn SeasonInfoProvider>,
    posters: Arc<dyn PosterDownloader>,
}

impl Organizer {
    /// Create an organizer without season lookups or poster downloads.
    pub fn new(subtitle: SubtitleConfig, country_folder: bool) -> Self {
        Self {
            executor: Executor::new(),
            subtitle,
            country_folder,
            seasons: Arc::new(NoMetadata),
            posters: Arc::new(NoMetadata),
        }
    }

    /// Use the given collaborators for season info and posters.
    pub fn with_metadata(
        mut self,
        seasons: Arc<dyn SeasonInfoProvider>,
        posters: Arc<dyn PosterDownloader>,
    ) -> Self {
        self.seasons = seasons;
        self.posters = posters;
        self
    }

    /// Organize one movie file. Returns the movie folder.
    pub async fn organize_movie(
        &self,
        movie: &MovieMatch,
        source: &Path,
        root: &Path,
        parsed: Option<&ParsedCandidate>,
        ctx: &mut RunContext,
    ) -> Result<PathBuf> {
        let folder_name = generate_movie_folder(movie, parsed);
        let dest_dir = if self.country_folder {
            root.join(movie_country_folder(movie)).join(&folder_name)
        } else {
            root.join(&folder_name)
        };

        let original_name = file_name_string(source);
        let file_name =
            generate_movie_filename(&folder_name, &original_name, &dotted_extension(source));

        // Related files are found before the video leaves its folder
        ctx.claim(source);
        let related: Vec<PathBuf> = self
            .find_related_files(source)
            .into_iter()
            .filter(|p| ctx.claim(p))
            .collect();

        self.executor.apply(
            PlannedOperation::move_file(
                source,
                dest_dir.join(&file_name),
                format!("Organize movie: {}", movie.title),
            ),
            ctx,
        )?;
        self.move_related(&related, &dest_dir, ctx);

        self.write_sidecars(
            &dest_dir,
            MOVIE_NFO,
            || generate_movie_nfo(movie),
            movie.poster_path.as_deref(),
            ctx,
        )
        .await;

        Ok(dest_dir)
    }

    /// Organize the files of one TV show. Returns the show folder.
    pub async fn organize_tv_show(
        &self,
        show: &TvShowMatch,
        files: &[PathBuf],
        root: &Path,
        parsed: Option<&ParsedCandidate>,
        ctx: &mut RunContext,
    ) -> Result<PathBuf> {
        let show_folder = generate_tvshow_folder(show, parsed);
        let show_dir = if self.country_folder {
            root.join(tvshow_country_folder(show)).join(&show_folder)
        } else {
            root.join(&show_folder)
        };

        for path in files {
            ctx.claim(path);
        }

        for (season, season_files) in group_by_season(files) {
            let season_info = self.seasons.season_info(show.tmdb_id, season).await;
            match season_info.as_ref().and_then(|s| s.air_year()) {
                Some(year) => tracing::info!("Season {} air year: {}", season, year),
                None => tracing::warn!(
                    "No air date for season {}, using show's first air year",
                    season
                ),
            }

            let season_dir = show_dir.join(generate_season_folder(
                season,
                season_info.as_ref().and_then(|s| s.air_year()),
                show.first_air_year(),
            ));

            for path in &season_files {
                let episode = episode_number(path);
                let file_name = generate_episode_filename(
                    show,
                    season,
                    episode,
                    &file_name_string(path),
                    &dotted_extension(path),
                );

                let related: Vec<PathBuf> = self
                    .find_related_files(path)
                    .into_iter()
                    .filter(|p| ctx.claim(p))
                    .collect();

                self.executor.apply(
                    PlannedOperation::move_file(
                        path,
                        season_dir.join(&file_name),
                        format!("Organize episode: S{:02}E{:02}", season, episode),
                    ),
                    ctx,
                )?;
                self.move_related(&related, &season_dir, ctx);
            }

            match &season_info {
                Some(info) => {
                    let poster = info.poster_path.as_deref().or(show.poster_path.as_deref());
                    self.write_sidecars(
                        &season_dir,
                        SEASON_NFO,
                        || generate_season_nfo(show, info),
                        poster,
                        ctx,
                    )
                    .await;
                }
                None => tracing::warn!(
                    "No season {} info for {}, skipping season sidecars",
                    season,
                    show.name
                ),
            }
        }

        Ok(show_dir)
    }

    /// Move an unmatched file into `Unmatched` next to it.
    pub fn move_to_unmatched(&self, path: &Path, ctx: &mut RunContext) -> Result<PathBuf> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let destination = parent.join(UNMATCHED_DIR).join(file_name_string(path));
        self.executor.apply(
            PlannedOperation::move_file(path, destination, "Move to Unmatched folder"),
            ctx,
        )
    }

    /// Move every leftover top-level entry of `root` into `Unwanted`.
    ///
    /// Keeps `Unmatched`, `Unwanted`, organized folders and, in country mode,
    /// country folders. Returns the number of entries moved.
    pub fn cleanup_unwanted(&self, root: &Path, ctx: &mut RunContext) -> Result<usize> {
        let mut names: Vec<String> = fs::read_dir(root)?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        let unwanted_dir = root.join(UNWANTED_DIR);
        let mut moved = 0;

        for name in names {
            if self.keep_at_root(&name) {
                continue;
            }
            let op = PlannedOperation::move_file(
                root.join(&name),
                unwanted_dir.join(&name),
                "Move to Unwanted folder",
            );
            match self.executor.apply(op, ctx) {
                Ok(_) => moved += 1,
                Err(e) => tracing::warn!("Cannot move {:?} to Unwanted: {}", name, e),
            }
        }

        tracing::info!("Unwanted cleanup: {} entries", moved);
        Ok(moved)
    }

    fn keep_at_root(&self, name: &str) -> bool {
        guard::is_bookkeeping_folder(name)
            || guard::looks_organized(name)
            || (self.country_folder
                && (guard::looks_like_country_folder(name) || name == UNKNOWN_COUNTRY_FOLDER))
    }

    /// Subtitles belonging to a video: same-stem files, the contents of
    /// sibling subtitle folders, and same-folder subtitles with a related stem.
    pub fn find_related_files(&self, video: &Path) -> Vec<PathBuf> {
        let Some(dir) = video.parent() else {
            return Vec::new();
        };
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut related: Vec<PathBuf> = Vec::new();
        let push = |path: PathBuf, related: &mut Vec<PathBuf>| {
            if path != video && !related.contains(&path) {
                related.push(path);
            }
        };

        for ext in &self.subtitle.extensions {
            let candidate = dir.join(format!("{}{}", stem, ext));
            if candidate.is_file() {
                push(candidate, &mut related);
            }
        }

        for folder in &self.subtitle.folder_names {
            let subtitle_dir = dir.join(folder);
            if subtitle_dir.is_dir() {
                for file in sorted_files(&subtitle_dir) {
                    push(file, &mut related);
                }
            }
        }

        for file in sorted_files(dir) {
            let name = file_name_string(&file);
            if !has_extension(&name, &self.subtitle.extensions) {
                continue;
            }
            let subtitle_stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if is_related_subtitle(&stem, &subtitle_stem) {
                push(file, &mut related);
            }
        }

        related
    }

    /// Move related files, keeping a subtitle folder under the destination.
    fn move_related(&self, related: &[PathBuf], dest_dir: &Path, ctx: &mut RunContext) {
        for file in related {
            let parent_name = file
                .parent()
                .map(file_name_string)
                .unwrap_or_default();
            let target_dir = if self.subtitle.folder_names.contains(&parent_name) {
                dest_dir.join(&parent_name)
            } else {
                dest_dir.to_path_buf()
            };

            let name = file_name_string(file);
            let op = PlannedOperation::move_file(
                file,
                target_dir.join(&name),
                format!("Move related file: {}", name),
            );
            if let Err(e) = self.executor.apply(op, ctx) {
                tracing::warn!("Failed to move related file {:?}: {}", file, e);
            }
        }
    }

    /// Write an NFO and poster into `dir` unless they already exist.
    async fn write_sidecars<F>(
        &self,
        dir: &Path,
        nfo_name: &str,
        nfo_content: F,
        poster: Option<&str>,
        ctx: &RunContext,
    ) where
        F: FnOnce() -> String,
    {
        let nfo_path = dir.join(nfo_name);
        let poster_path = dir.join(POSTER);

        if ctx.is_dry_run() {
            tracing::info!("DRY RUN: Would generate {:?}", nfo_path);
            if poster.is_some() {
                tracing::info!("DRY RUN: Would download poster {:?}", poster_path);
            }
            return;
        }

        if nfo_path.exists() {
            tracing::info!("NFO already exists: {:?}", nfo_path);
        } else {
            match fs::create_dir_all(dir).and_then(|_| fs::write(&nfo_path, nfo_content())) {
                Ok(()) => tracing::info!("Generated {:?}", nfo_path),
                Err(e) => tracing::warn!("Failed to write {:?}: {}", nfo_path, e),
            }
        }

        if poster_path.exists() {
            tracing::info!("Poster already exists: {:?}", poster_path);
        } else if poster.is_some() {
            self.posters.download_poster(poster, &poster_path).await;
        }
    }
}

fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(e) => {
            tracing::debug!("Cannot list {:?}: {}", dir, e);
            Vec::new()
        }
    };
    files.sort();
    files
}
