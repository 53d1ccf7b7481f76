//! Extraction backend abstraction.
//!
//! The bot never downloads anything itself: a [`VideoExtractor`] turns a page
//! URL into a local file plus the metadata needed for the caption. The
//! production backend is [`ytdlp::YtDlpExtractor`]; tests plug in their own.

pub mod ytdlp;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Output from a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVideo {
    /// Local path of the downloaded file
    pub file_path: PathBuf,
    /// Description of the post, or its title when there is no description
    pub description: String,
    /// Canonical page URL reported by the extractor
    pub webpage_url: String,
}

impl DownloadedVideo {
    /// Whether there is any description worth offering to keep or clear
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Trait for extraction backends.
#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Human-readable name of this backend (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Downloads the media behind `url`.
    ///
    /// `output_stem` is a file name without extension, unique per request;
    /// the backend picks the extension.
    async fn extract(&self, url: &str, output_stem: &str) -> Result<DownloadedVideo, AppError>;
}
