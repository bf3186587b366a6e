//! Subcommand modules for the `conscore` binary.

pub mod list;
pub mod score;
