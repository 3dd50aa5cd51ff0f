//! Data models.

pub mod config;
pub mod media;
pub mod plan;
pub mod session;
