//! Media Shelf Library
//!
//! Identifies loosely named movie and TV files with a local LLM and TMDB, then
//! shelves them into a canonical bilingual library layout with NFO sidecars.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
