use std::fmt;

/// Structured error type for download operations.
///
/// Each variant carries the detail message that ends up in the log; the
/// text shown to the user comes from [`DownloadError::user_message`].
#[derive(Debug)]
pub enum DownloadError {
    /// yt-dlp exited with a failure status
    YtDlp { kind: YtDlpErrorKind, detail: String },
    /// yt-dlp could not be started at all
    Spawn(String),
    /// yt-dlp ran longer than the configured timeout
    Timeout(String),
    /// Expected file not found after the download
    FileNotFound(String),
}

/// Rough category of a yt-dlp failure, derived from its stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorKind {
    /// Login required or cookies rejected
    AuthRequired,
    /// Private, removed or region-locked media
    Unavailable,
    /// Link is not something yt-dlp can handle
    Unsupported,
    /// Timeouts, DNS, connection resets
    Network,
    Unknown,
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::YtDlp { detail, .. } => write!(f, "{}", detail),
            DownloadError::Spawn(msg) => write!(f, "{}", msg),
            DownloadError::Timeout(msg) => write!(f, "{}", msg),
            DownloadError::FileNotFound(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Builds a yt-dlp failure from the process stderr.
    pub fn from_stderr(stderr: &str) -> Self {
        DownloadError::YtDlp {
            kind: analyze_ytdlp_error(stderr),
            detail: summarize_stderr(stderr),
        }
    }

    /// Returns subcategory for logging
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::YtDlp { .. } => "ytdlp",
            DownloadError::Spawn(_) => "spawn",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::FileNotFound(_) => "file_not_found",
        }
    }

    /// Human-readable reason for the chat reply.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::YtDlp { kind, detail } => match kind {
                YtDlpErrorKind::AuthRequired => "this video requires login (cookies missing or expired)".to_string(),
                YtDlpErrorKind::Unavailable => "the video is unavailable (private, removed or region-locked)".to_string(),
                YtDlpErrorKind::Unsupported => "this link is not supported".to_string(),
                YtDlpErrorKind::Network => "network problem, please try again in a minute".to_string(),
                YtDlpErrorKind::Unknown => detail.clone(),
            },
            DownloadError::Timeout(_) => "the download took too long".to_string(),
            other => other.to_string(),
        }
    }
}

/// Classifies yt-dlp stderr into a [`YtDlpErrorKind`].
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorKind {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("login required")
        || stderr_lower.contains("cookies are no longer valid")
        || stderr_lower.contains("sign in to confirm")
        || stderr_lower.contains("please sign in")
        || stderr_lower.contains("use --cookies")
        || stderr_lower.contains("rate-limit reached or login required")
    {
        return YtDlpErrorKind::AuthRequired;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("has been removed")
        || stderr_lower.contains("not available in your country")
        || stderr_lower.contains("http error 404")
    {
        return YtDlpErrorKind::Unavailable;
    }

    if stderr_lower.contains("unsupported url") || stderr_lower.contains("no video formats found") {
        return YtDlpErrorKind::Unsupported;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("temporary failure in name resolution")
    {
        return YtDlpErrorKind::Network;
    }

    YtDlpErrorKind::Unknown
}

/// Reduces yt-dlp stderr to its last `ERROR:` line, or the last non-empty
/// line when there is none.
pub fn summarize_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    if let Some(line) = lines.iter().rev().find(|l| l.starts_with("ERROR:")) {
        return line.trim_start_matches("ERROR:").trim().to_string();
    }

    lines
        .last()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp failed without an error message".to_string())
}
