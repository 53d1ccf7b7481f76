//! Reelbot - Telegram bot that turns video links into videos
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging and caption utilities
//! - `download`: share-link resolution and the yt-dlp extraction backend
//! - `telegram`: bot construction, handlers, inline buttons and the link cache
//! - `cli`: command-line interface

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, BotConfig};
pub use crate::download::{DownloadedVideo, VideoExtractor, YtDlpExtractor};
pub use crate::telegram::{schema, HandlerDeps, LinkCache};
