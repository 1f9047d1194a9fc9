use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "cinema",
    version,
    about = "A lightweight movie catalog browser with offline bookmarks",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Catalog API key.
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Catalog API base URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show this week's trending movies.
    Trending {
        /// How many pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show movies currently playing in theaters.
    NowPlaying {
        /// How many pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Search the catalog.
    Search {
        /// Search query.
        query: String,

        /// How many pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List bookmarked movies, most recent first.
    Bookmarks,

    /// Toggle the bookmark for a movie id.
    Bookmark {
        /// Movie id.
        id: u64,
    },

    /// Resolve a deep link and show the movie's details.
    Open {
        /// Deep link, e.g. cinema://movie/603
        link: String,
    },
}
