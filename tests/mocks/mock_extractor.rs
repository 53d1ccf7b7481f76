//! Mock extractor
//!
//! Stands in for yt-dlp: writes a small file named after the requested stem
//! and returns canned metadata, or fails the way yt-dlp would.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use reelbot::download::error::DownloadError;
use reelbot::{AppError, DownloadedVideo, VideoExtractor};

/// What the next `extract` call does
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Write `<stem>.mp4` and report this description and page URL
    Video { description: String, webpage_url: String },
    /// Fail with this yt-dlp stderr
    Fail { stderr: String },
}

pub struct MockExtractor {
    downloads_dir: PathBuf,
    outcome: MockOutcome,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockExtractor {
    pub fn new(downloads_dir: impl Into<PathBuf>, outcome: MockOutcome) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn video(downloads_dir: impl Into<PathBuf>, description: &str, webpage_url: &str) -> Self {
        Self::new(
            downloads_dir,
            MockOutcome::Video {
                description: description.to_string(),
                webpage_url: webpage_url.to_string(),
            },
        )
    }

    pub fn failing(downloads_dir: impl Into<PathBuf>, stderr: &str) -> Self {
        Self::new(
            downloads_dir,
            MockOutcome::Fail {
                stderr: stderr.to_string(),
            },
        )
    }

    /// `(url, output_stem)` for every call so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, url: &str, output_stem: &str) -> Result<DownloadedVideo, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), output_stem.to_string()));

        match &self.outcome {
            MockOutcome::Video {
                description,
                webpage_url,
            } => {
                let file_path = self.downloads_dir.join(format!("{}.mp4", output_stem));
                tokio::fs::write(&file_path, b"\x00\x00\x00\x18ftypmp42").await?;
                Ok(DownloadedVideo {
                    file_path,
                    description: description.clone(),
                    webpage_url: webpage_url.clone(),
                })
            }
            MockOutcome::Fail { stderr } => Err(DownloadError::from_stderr(stderr).into()),
        }
    }
}
