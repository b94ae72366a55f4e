pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "homefeeds")]
#[command(about = "Assemble the start page feeds from a browser profile", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/homefeeds/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile directory holding recommended-addons.json and sessionstore.js
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Packaged application archive used as add-ons fallback
    #[arg(long, global = true)]
    pub package: Option<PathBuf>,

    /// Site-visit database for top sites and favicons
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one load cycle and print every published feed
    Show {
        /// Lay top sites out for a landscape screen
        #[arg(long)]
        landscape: bool,
    },
    /// Load in portrait, then rotate to landscape and print the republished top sites
    Rotate,
}
