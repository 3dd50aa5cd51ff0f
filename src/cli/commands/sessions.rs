//! Sessions command implementation.
//!
//! Reads the `scan_session_<id>.json` files kept in the sessions directory.

use crate::models::session::{ParseOutcome, ScanSession};
use crate::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_PREFIX: &str = "scan_session_";

/// Session files in `dir`, most recent first.
pub fn session_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension().map(|e| e == "json").unwrap_or(false)
                && p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(SESSION_PREFIX))
                    .unwrap_or(false)
        })
        .collect();

    // IDs are timestamps, so name order is time order
    files.sort();
    files.reverse();
    Ok(files)
}

/// List all sessions.
pub fn list_sessions(sessions_dir: &Path) -> Result<()> {
    println!("{}", "📁 Sessions".bold().cyan());
    println!();

    let files = session_files(sessions_dir)?;
    if files.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!(
        "{:<18} {:<8} {:<8} {:<8} {}",
        "Session ID".bold(),
        "Total".bold(),
        "Parsed".bold(),
        "Failed".bold(),
        "Kinds".bold()
    );
    println!("{}", "-".repeat(70));

    for path in files {
        match ScanSession::load(&path) {
            Ok(session) => println!(
                "{:<18} {:<8} {:<8} {:<8} {} movies, {} tv",
                session.session_id,
                session.summary.total_files,
                session.summary.successful_parses,
                session.summary.failed_parses,
                session.summary.movies,
                session.summary.tv_shows
            ),
            Err(_) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                println!("{:<18} {}", name, "(corrupted)".red());
            }
        }
    }

    println!();
    println!("Sessions directory: {}", sessions_dir.display());

    Ok(())
}

/// Show details of a specific session.
pub fn show_session(sessions_dir: &Path, session_id: &str) -> Result<()> {
    let path = sessions_dir.join(format!("{}{}.json", SESSION_PREFIX, session_id));
    if !path.exists() {
        return Err(crate::Error::PathNotFound(format!(
            "Session not found: {}",
            session_id
        )));
    }
    let session = ScanSession::load(&path)?;

    println!("{} {}", "📋 Session:".bold().cyan(), session.session_id);
    println!();
    println!("  {} {}", "Timestamp:".bold(), session.timestamp);
    println!("  {} {}", "Total:".bold(), session.summary.total_files);
    println!("  {} {}", "Parsed:".bold(), session.summary.successful_parses);
    println!("  {} {}", "Failed:".bold(), session.summary.failed_parses);
    println!();

    for record in &session.scan_results {
        let context = record
            .folder_context
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        match &record.parsed_result {
            ParseOutcome::Parsed(parsed) => {
                let titles: Vec<&str> = [
                    parsed.localized_title.as_deref(),
                    parsed.original_title.as_deref(),
                ]
                .into_iter()
                .flatten()
                .collect();
                let year = parsed.year.map(|y| format!(" ({})", y)).unwrap_or_default();
                println!(
                    "  {} {}{} -> {}{} {:.2}",
                    "✓".green(),
                    record.filename,
                    context,
                    titles.join(" / "),
                    year,
                    parsed.confidence
                );
            }
            ParseOutcome::Failed(reason) => {
                println!(
                    "  {} {}{} ({})",
                    "✗".red(),
                    record.filename,
                    context,
                    reason.yellow()
                );
            }
        }
    }

    Ok(())
}
