use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Library code returns `AppResult`; the binary wraps everything in `anyhow`.
/// Handlers never bubble these up to the dispatcher: they turn them into a
/// human-readable reply and keep running.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Download/yt-dlp errors
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// HTTP errors while following share links
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// yt-dlp info JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Text shown to the user when a request fails.
    ///
    /// Download errors carry their own user-facing wording; everything else
    /// falls back to the display string.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Download(e) => e.user_message(),
            AppError::Json(_) => "yt-dlp returned output that could not be read".to_string(),
            other => other.to_string(),
        }
    }
}
