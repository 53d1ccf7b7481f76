use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reelbot")]
#[command(author, version, about = "Telegram bot that downloads videos from links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Download a single video with the bot's yt-dlp settings and print the result
    Download {
        /// Video page URL
        url: String,

        /// Directory to save the file into (defaults to DOWNLOAD_FOLDER)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Update yt-dlp in place
    UpdateYtdlp {
        /// Only print the installed version
        #[arg(long)]
        check: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
