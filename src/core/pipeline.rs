//! Per-run coordinator.
//!
//! Scans the root, turns files into work items (one per movie file, one per
//! top-level TV folder), and runs parse, match and organize for each item in
//! sequence. An item that fails at any stage sends its files to `Unmatched`.

use super::matcher::{MatchOutcome, Matcher, MetadataProvider};
use super::organizer::Organizer;
use super::parser::{FilenameParser, LanguageModel};
use super::scanner::scan_directory;
use crate::models::config::{Config, VideoConfig};
use crate::models::media::{MediaFile, MediaKind};
use crate::models::plan::RunContext;
use crate::utils::fs::file_name_string;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Video files found by the scanner.
    pub scanned: usize,
    /// Video files organized into the library.
    pub processed: usize,
    /// Files routed to `Unmatched`.
    pub unmatched: Vec<PathBuf>,
    /// Top-level entries moved to `Unwanted`.
    pub unwanted: usize,
    /// Where the session summary was written.
    pub session_path: Option<PathBuf>,
}

/// Parent directory name of a movie file, unless it sits directly under the root.
pub fn folder_context(root: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?;
    if parent == root {
        return None;
    }
    Some(file_name_string(parent)).filter(|name| !name.is_empty())
}

/// Group TV files by their first path component below the root.
pub fn group_tv_items(root: &Path, files: &[MediaFile]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let key = file
            .path
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .unwrap_or_else(|| file.name.clone());
        groups.entry(key).or_default().push(file.path.clone());
    }
    groups
}

/// Scan, identify and organize one directory.
pub struct Pipeline {
    parser: FilenameParser,
    matcher: Arc<Matcher>,
    organizer: Organizer,
    video: VideoConfig,
    sessions_dir: PathBuf,
}

impl Pipeline {
    /// Wire the pipeline to a language model and a metadata provider.
    pub fn new(
        config: &Config,
        model: Arc<dyn LanguageModel>,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        let matcher = Arc::new(Matcher::new(provider));
        let organizer = Organizer::new(config.subtitle.clone(), config.processing.country_folder)
            .with_metadata(matcher.clone(), matcher.clone());

        Self {
            parser: FilenameParser::new(model, config.prompts.clone()),
            matcher,
            organizer,
            video: config.video.clone(),
            sessions_dir: config.sessions_dir.clone(),
        }
    }

    /// Process every item under `root` as the given media kind.
    pub async fn run(
        &self,
        root: &Path,
        kind: MediaKind,
        ctx: &mut RunContext,
    ) -> Result<RunReport> {
        let files = scan_directory(root, &self.video)?;
        let mut report = RunReport {
            scanned: files.len(),
            ..RunReport::default()
        };

        if files.is_empty() {
            tracing::info!("No media files found under {:?}", root);
            return Ok(report);
        }

        match kind {
            MediaKind::Movie => self.run_movies(root, &files, ctx, &mut report).await,
            MediaKind::TvShow => self.run_tv_shows(root, &files, ctx, &mut report).await,
        }

        if !report.unmatched.is_empty() {
            tracing::info!(
                "Moving {} unmatched files to Unmatched folder",
                report.unmatched.len()
            );
        }
        for path in &report.unmatched {
            if !ctx.is_dry_run() && !path.exists() {
                tracing::debug!("Unmatched file already moved: {:?}", path);
                continue;
            }
            if let Err(e) = self.organizer.move_to_unmatched(path, ctx) {
                tracing::warn!("Cannot move {:?} to Unmatched: {}", path, e);
            }
        }

        if !ctx.is_dry_run() {
            match self.organizer.cleanup_unwanted(root, ctx) {
                Ok(moved) => report.unwanted = moved,
                Err(e) => tracing::warn!("Unwanted cleanup skipped for {:?}: {}", root, e),
            }
        }

        match ctx.session.save(&self.sessions_dir) {
            Ok(path) => report.session_path = Some(path),
            Err(e) => tracing::warn!("Failed to save scan session: {}", e),
        }

        Ok(report)
    }

    async fn run_movies(
        &self,
        root: &Path,
        files: &[MediaFile],
        ctx: &mut RunContext,
        report: &mut RunReport,
    ) {
        let pb = progress_bar(files.len());

        for file in files {
            pb.set_message(file.name.clone());
            match self.process_movie(root, file, ctx).await {
                Ok(true) => report.processed += 1,
                Ok(false) => report.unmatched.push(file.path.clone()),
                Err(e) => {
                    tracing::error!("Error processing {:?}: {}", file.path, e);
                    report.unmatched.push(file.path.clone());
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
    }

    async fn run_tv_shows(
        &self,
        root: &Path,
        files: &[MediaFile],
        ctx: &mut RunContext,
        report: &mut RunReport,
    ) {
        let groups = group_tv_items(root, files);
        let pb = progress_bar(groups.len());

        for (folder_name, paths) in &groups {
            pb.set_message(format!("{} ({} files)", folder_name, paths.len()));
            match self.process_tv_show(root, folder_name, paths, ctx).await {
                Ok(true) => report.processed += paths.len(),
                Ok(false) => report.unmatched.extend(paths.iter().cloned()),
                Err(e) => {
                    tracing::error!("Error processing TV folder {:?}: {}", folder_name, e);
                    report.unmatched.extend(paths.iter().cloned());
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
    }

    /// Returns `Ok(false)` when the file could not be identified.
    async fn process_movie(
        &self,
        root: &Path,
        file: &MediaFile,
        ctx: &mut RunContext,
    ) -> Result<bool> {
        let context = folder_context(root, &file.path);
        let Some(parsed) = self
            .parser
            .parse_movie(&file.name, context.as_deref(), &mut ctx.session)
            .await
        else {
            return Ok(false);
        };

        let movie = match self.matcher.search_movie(&parsed).await {
            MatchOutcome::Found(movie) => movie,
            MatchOutcome::NotFound => {
                tracing::warn!("No TMDB match for {:?}", file.name);
                return Ok(false);
            }
            MatchOutcome::TransportError(e) => {
                tracing::warn!("TMDB unavailable for {:?}: {}", file.name, e);
                return Ok(false);
            }
        };

        self.organizer
            .organize_movie(&movie, &file.path, root, Some(&parsed), ctx)
            .await?;
        Ok(true)
    }

    /// Returns `Ok(false)` when the folder could not be identified.
    async fn process_tv_show(
        &self,
        root: &Path,
        folder_name: &str,
        paths: &[PathBuf],
        ctx: &mut RunContext,
    ) -> Result<bool> {
        let Some(parsed) = self
            .parser
            .parse_tv_show(folder_name, &mut ctx.session)
            .await
        else {
            return Ok(false);
        };

        let show = match self.matcher.search_tv_show(&parsed).await {
            MatchOutcome::Found(show) => show,
            MatchOutcome::NotFound => {
                tracing::warn!("No TMDB match for TV folder {:?}", folder_name);
                return Ok(false);
            }
            MatchOutcome::TransportError(e) => {
                tracing::warn!("TMDB unavailable for TV folder {:?}: {}", folder_name, e);
                return Ok(false);
            }
        };

        self.organizer
            .organize_tv_show(&show, paths, root, Some(&parsed), ctx)
            .await?;
        Ok(true)
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}
