//! Core business logic modules.

pub mod executor;
pub mod grouper;
pub mod guard;
pub mod matcher;
pub mod organizer;
pub mod parser;
pub mod pipeline;
pub mod scanner;
