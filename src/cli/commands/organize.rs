//! Organize command implementation.
//!
//! Wires the Ollama and TMDB clients into the pipeline, runs it over one
//! directory and prints the outcome.

use crate::core::pipeline::{Pipeline, RunReport};
use crate::models::config::Config;
use crate::models::media::MediaKind;
use crate::models::plan::{RunContext, RunMode};
use crate::services::ollama::OllamaClient;
use crate::services::tmdb::TmdbClient;
use crate::utils::fs::ensure_directory;
use crate::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Execute the organize command.
pub async fn organize(config: &Config, path: &Path, media_kind: MediaKind) -> Result<()> {
    ensure_directory(path)?;

    let dry_run = config.processing.dry_run;
    let header = match media_kind {
        MediaKind::Movie => "🎬 Organizing movies...",
        MediaKind::TvShow => "📺 Organizing TV shows...",
    };
    println!("{}", header.bold().cyan());
    println!();
    println!("  {} {}", "Path:".bold(), path.display());
    println!(
        "  {} {}",
        "Mode:".bold(),
        if dry_run { "DRY RUN".yellow() } else { "LIVE".green() }
    );
    println!("  {} {}", "Type:".bold(), media_kind);
    if config.processing.country_folder {
        println!("  {} {}", "Country folders:".bold(), "on");
    }
    println!();

    let model = Arc::new(OllamaClient::new(&config.ollama)?);
    let provider = Arc::new(TmdbClient::new(&config.tmdb)?);
    let pipeline = Pipeline::new(config, model, provider);

    let mut ctx = RunContext::new(RunMode::from_dry_run(dry_run));
    let report = pipeline.run(path, media_kind, &mut ctx).await?;

    print_report(&report);
    if ctx.is_dry_run() {
        print_operations(&ctx);
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    println!("{}", "📋 Results".bold().green());
    println!("  {} {}", "Media files found:".bold(), report.scanned);
    println!("  {} {}", "Processed:".bold(), report.processed);
    println!("  {} {}", "Unmatched:".bold(), report.unmatched.len());
    if report.unwanted > 0 {
        println!("  {} {}", "Moved to Unwanted:".bold(), report.unwanted);
    }
    if let Some(path) = &report.session_path {
        println!("  {} {}", "Session saved to:".bold(), path.display());
    }

    if !report.unmatched.is_empty() {
        println!();
        println!("{}", "⚠️  Unmatched Files:".bold().yellow());
        for path in &report.unmatched {
            println!("  {}", path.display().to_string().red());
        }
    }
}

fn print_operations(ctx: &RunContext) {
    println!();
    println!(
        "{} {}",
        "Planned operations:".bold(),
        ctx.operations.len()
    );
    for op in ctx.operations.iter() {
        println!("  {} {}", format!("[{}]", op.kind).cyan(), op.description);
        println!("      {}", op.source.display());
        println!("   -> {}", op.destination.display().to_string().green());
    }
}
