//! Subcommand implementations.

pub mod config;
pub mod preview;
pub mod split;
