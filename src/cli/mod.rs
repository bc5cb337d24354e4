//! CLI module - Command-line interface for showsync
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// showsync - TV show metadata mirror
/// Copies the TVmaze show catalog into a local database and serves it over HTTP
#[derive(Parser)]
#[command(name = "showsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API and the background scheduler (default)
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Run a single synchronization and print its report
    #[command(alias = "-s", alias = "--sync")]
    Sync,

    /// List stored shows
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show details about a stored show
    #[command(alias = "i", alias = "info")]
    Show {
        /// Show ID
        id: i32,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
