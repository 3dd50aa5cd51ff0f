//! Command line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Media Shelf - Identify and shelve movies and TV shows with AI and TMDB
#[derive(Parser, Debug)]
#[command(name = "media-shelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Config file (default: <config dir>/media_shelf/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Organize the media files under a directory
    Organize {
        /// Directory to organize
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Media type to process
        #[arg(long = "type", value_enum)]
        media_type: MediaTypeArg,

        /// Preview mode, do not move files
        #[arg(long)]
        dry_run: bool,

        /// Group output into country folders (e.g. US_United_States)
        #[arg(long)]
        country_folder: bool,
    },

    /// Inspect saved scan sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

/// Media type selector for `organize`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaTypeArg {
    Movie,
    Tv,
}

#[derive(Subcommand, Debug)]
pub enum SessionsAction {
    /// List all sessions
    List,

    /// Show session details
    Show {
        /// Session ID (e.g. 20250101_120000)
        #[arg(value_name = "SESSION_ID")]
        session_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organize() {
        let cli = Cli::try_parse_from([
            "media-shelf",
            "-v",
            "organize",
            "/media/incoming",
            "--type",
            "tv",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Organize {
                path,
                media_type,
                dry_run,
                country_folder,
            } => {
                assert_eq!(path, PathBuf::from("/media/incoming"));
                assert_eq!(media_type, MediaTypeArg::Tv);
                assert!(dry_run);
                assert!(!country_folder);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_type_is_required() {
        assert!(Cli::try_parse_from(["media-shelf", "organize", "/media"]).is_err());
    }

    #[test]
    fn test_parse_sessions_show() {
        let cli =
            Cli::try_parse_from(["media-shelf", "sessions", "show", "20250101_120000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sessions {
                action: SessionsAction::Show { .. }
            }
        ));
    }
}
