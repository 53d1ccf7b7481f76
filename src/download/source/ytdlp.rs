//! The production extraction backend, powered by yt-dlp.
//!
//! Runs yt-dlp once per request with `--no-simulate --dump-single-json`:
//! the file is downloaded and the final info dict (including the real file
//! path) is printed to stdout as a single JSON document.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::config::{self, ExtractorConfig};
use crate::core::error::AppError;
use crate::core::utils::cleanup_file;
use crate::download::error::DownloadError;
use crate::download::source::{DownloadedVideo, VideoExtractor};

/// Extractor arguments for YouTube: skip adaptive manifests, try the android
/// client before web, and skip player config requests.
const YOUTUBE_EXTRACTOR_ARGS: &str = "youtube:skip=dash,hls;player_client=android,web;player_skip=configs";

/// Fixed yt-dlp configuration for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpOptions {
    /// Output path template, e.g. `downloads/3f2a....%(ext)s`
    pub output_template: String,
    /// Format selector
    pub format: String,
    pub retries: u32,
    pub fragment_retries: u32,
    pub user_agent: String,
    pub extractor_args: String,
    pub socket_timeout_secs: u64,
    /// Netscape cookie file, only set when the file exists
    pub cookies_file: Option<PathBuf>,
}

impl YtDlpOptions {
    /// Options for a download into `downloads_dir` under `output_stem`.
    pub fn new(downloads_dir: &Path, output_stem: &str, format: &str, cookies_file: Option<&Path>) -> Self {
        Self {
            output_template: downloads_dir
                .join(format!("{}.%(ext)s", output_stem))
                .to_string_lossy()
                .to_string(),
            format: format.to_string(),
            retries: config::download::RETRIES,
            fragment_retries: config::download::FRAGMENT_RETRIES,
            user_agent: config::download::USER_AGENT.to_string(),
            extractor_args: YOUTUBE_EXTRACTOR_ARGS.to_string(),
            socket_timeout_secs: config::download::SOCKET_TIMEOUT_SECS,
            cookies_file: cookies_file.map(Path::to_path_buf),
        }
    }

    /// Builds the yt-dlp argument list for `url`.
    pub fn to_args(&self, url: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--no-simulate".to_string(),
            "--dump-single-json".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            self.output_template.clone(),
            "--format".to_string(),
            self.format.clone(),
            "--retries".to_string(),
            self.retries.to_string(),
            "--fragment-retries".to_string(),
            self.fragment_retries.to_string(),
            "--add-header".to_string(),
            format!("User-Agent:{}", self.user_agent),
            "--extractor-args".to_string(),
            self.extractor_args.clone(),
            "--socket-timeout".to_string(),
            self.socket_timeout_secs.to_string(),
            "--no-check-certificates".to_string(),
        ];

        if let Some(cookies) = &self.cookies_file {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().to_string());
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

/// The parts of the yt-dlp info dict we care about.
#[derive(Debug, Default, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub webpage_url: Option<String>,
    #[serde(rename = "_filename")]
    pub internal_filename: Option<String>,
    pub filename: Option<String>,
    #[serde(default)]
    pub requested_downloads: Vec<RequestedDownload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestedDownload {
    pub filepath: Option<String>,
    #[serde(rename = "_filename")]
    pub internal_filename: Option<String>,
}

impl VideoInfo {
    /// Parses the JSON printed by `--dump-single-json`.
    pub fn parse(stdout: &str) -> serde_json::Result<Self> {
        serde_json::from_str(stdout.trim())
    }

    /// Description, falling back to the title, then to an empty string.
    pub fn caption_text(&self) -> String {
        [&self.description, &self.title]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_default()
    }

    /// Canonical page URL, falling back to the URL that was requested.
    pub fn page_url(&self, requested_url: &str) -> String {
        self.webpage_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(requested_url)
            .to_string()
    }

    /// Path yt-dlp reports for the final file, best source first.
    pub fn reported_path(&self) -> Option<PathBuf> {
        self.requested_downloads
            .iter()
            .flat_map(|d| [&d.filepath, &d.internal_filename])
            .chain([&self.internal_filename, &self.filename])
            .flatten()
            .find(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

/// Finds the downloaded file when the reported path is missing or stale.
///
/// Post-processing can change the extension; any file in `dir` whose name
/// starts with `stem` counts, skipping yt-dlp's `.part` leftovers.
pub fn find_downloaded_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    let entries = fs_err::read_dir(dir).ok()?;
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(stem) && !n.ends_with(".part") && !n.ends_with(".ytdl"))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found.pop()
}

/// Removes everything a run under `stem` left in `dir`: finished files,
/// `.part`/`.part-FragN.part` pieces and `.ytdl` resume markers.
pub fn cleanup_partials(dir: &Path, stem: &str) {
    let Ok(entries) = fs_err::read_dir(dir) else {
        return;
    };

    for path in entries.filter_map(Result::ok).map(|e| e.path()) {
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(stem))
            .unwrap_or(false);
        if matches && path.is_file() {
            cleanup_file(&path);
        }
    }
}

/// Extraction backend that shells out to yt-dlp.
pub struct YtDlpExtractor {
    ytdl_bin: String,
    downloads_dir: PathBuf,
    format: String,
    cookies_file: Option<PathBuf>,
    timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            ytdl_bin: config.ytdl_bin.clone(),
            downloads_dir: config.downloads_dir.clone(),
            format: config.video_format.clone(),
            cookies_file: config.usable_cookies_file().map(Path::to_path_buf),
            timeout: config.timeout,
        }
    }

    pub fn options(&self, output_stem: &str) -> YtDlpOptions {
        YtDlpOptions::new(
            &self.downloads_dir,
            output_stem,
            &self.format,
            self.cookies_file.as_deref(),
        )
    }
}

#[async_trait]
impl VideoExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str, output_stem: &str) -> Result<DownloadedVideo, AppError> {
        let args = self.options(output_stem).to_args(url);
        log::debug!("yt-dlp command: {} {}", self.ytdl_bin, args.join(" "));

        let mut cmd = Command::new(&self.ytdl_bin);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| {
                log::error!("Failed to execute {}: {}", self.ytdl_bin, e);
                DownloadError::Spawn(format!("Failed to run {}: {}", self.ytdl_bin, e))
            })?,
            Err(_) => {
                log::error!("yt-dlp timed out after {}s for {}", self.timeout.as_secs(), url);
                // The child is killed on drop; whatever it wrote stays behind
                cleanup_partials(&self.downloads_dir, output_stem);
                return Err(DownloadError::Timeout(format!("yt-dlp timed out after {}s", self.timeout.as_secs())).into());
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let error = DownloadError::from_stderr(&stderr);
            log::error!(
                "yt-dlp failed for {} (exit {:?}, {}): {}",
                url,
                output.status.code(),
                error.subcategory(),
                stderr.trim()
            );
            cleanup_partials(&self.downloads_dir, output_stem);
            return Err(error.into());
        }

        let info = VideoInfo::parse(&String::from_utf8_lossy(&output.stdout))?;

        let file_path = info
            .reported_path()
            .filter(|p| p.exists())
            .or_else(|| find_downloaded_file(&self.downloads_dir, output_stem))
            .ok_or_else(|| {
                DownloadError::FileNotFound(format!(
                    "Downloaded file not found for {} in {}",
                    output_stem,
                    self.downloads_dir.display()
                ))
            })?;

        log::info!("Downloaded {} -> {}", url, file_path.display());

        Ok(DownloadedVideo {
            file_path,
            description: info.caption_text(),
            webpage_url: info.page_url(url),
        })
    }
}
