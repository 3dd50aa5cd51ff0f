//! Media Shelf CLI
//!
//! A command-line tool that identifies movie and TV files with a local LLM and TMDB
//! and shelves them into a bilingual library layout.

use clap::Parser;
use media_shelf::cli::{
    args::{Cli, Commands, MediaTypeArg, SessionsAction},
    commands::{organize, sessions},
};
use media_shelf::models::config::{load_config, Config};
use media_shelf::models::media::MediaKind;
use media_shelf::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Organize {
            path,
            media_type,
            dry_run,
            country_folder,
        } => {
            config.processing.dry_run = dry_run;
            config.processing.country_folder = country_folder;

            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }

            let media_kind = match media_type {
                MediaTypeArg::Movie => MediaKind::Movie,
                MediaTypeArg::Tv => MediaKind::TvShow,
            };
            organize::organize(&config, &path, media_kind).await?;
        }

        Commands::Sessions { action } => match action {
            SessionsAction::List => {
                sessions::list_sessions(&config.sessions_dir)?;
            }
            SessionsAction::Show { session_id } => {
                sessions::show_session(&config.sessions_dir, &session_id)?;
            }
        },
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_shelf=debug")
    } else {
        EnvFilter::new("media_shelf=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
