//! CLI subcommands

pub mod deploy;
pub mod list;
pub mod search;
pub mod show;
pub mod theme;
