//! Shared utilities.

pub mod cjk;
pub mod fs;
pub mod hash;
