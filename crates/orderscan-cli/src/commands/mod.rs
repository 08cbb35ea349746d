//! CLI subcommands.

pub mod analyze;
pub mod config;
pub mod interactive;
pub mod output;
pub mod parse;
