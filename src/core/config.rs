use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::core::error::{AppError, AppResult};

/// Directory that may hold `.env` and cookie files kept out of the repo
pub const SECRETS_DIR: &str = "secrets";

/// Cookie file names searched when YTDL_COOKIES_FILE is not set
pub const COOKIES_FILE_NAME: &str = "www.instagram.com_cookies.txt";

/// Telegram caption limit for media messages
pub const DEFAULT_CAPTION_MAX_LENGTH: usize = 1024;

/// Loads `secrets/.env` if present, otherwise `.env` from the working directory.
///
/// Missing files are fine; the process environment still applies.
pub fn load_env_files() {
    let secrets_env = Path::new(SECRETS_DIR).join(".env");
    let result = if secrets_env.exists() {
        dotenvy::from_path(&secrets_env).map(|_| secrets_env.clone())
    } else {
        dotenvy::dotenv()
    };

    if let Ok(path) = result {
        log::debug!("Loaded environment from {}", path.display());
    }
}

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub fn log_file_path() -> String {
    env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string())
}

/// Download configuration
pub mod download {
    /// Default timeout for a single yt-dlp run (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 300;

    /// Socket timeout passed to yt-dlp (in seconds)
    pub const SOCKET_TIMEOUT_SECS: u64 = 30;

    /// Retries passed to yt-dlp for whole requests and for fragments
    pub const RETRIES: u32 = 3;
    pub const FRAGMENT_RETRIES: u32 = 3;

    /// Default yt-dlp format selector
    pub const DEFAULT_FORMAT: &str = "mp4/best";

    /// Desktop Chrome User-Agent sent with every yt-dlp request
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
}

/// Share-link resolution configuration
pub mod resolve {
    use super::Duration;

    /// Timeout for the HEAD request that follows share redirects (in seconds)
    pub const TIMEOUT_SECS: u64 = 10;

    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for uploading a 50 MB video on a slow link
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Link cache sizing
pub mod link_cache {
    /// Once the cache holds more entries than this it gets trimmed
    pub const CAPACITY: usize = 100;

    /// Number of newest entries kept after a trim
    pub const RETAIN: usize = 50;
}

/// Everything the extraction backend needs; no Telegram token involved, so
/// the one-shot CLI download can use it on its own.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// yt-dlp binary from YTDL_BIN, defaults to "yt-dlp"
    pub ytdl_bin: String,
    /// Where downloads land, from DOWNLOAD_FOLDER, defaults to "downloads"
    pub downloads_dir: PathBuf,
    /// yt-dlp format selector from VIDEO_FORMAT
    pub video_format: String,
    /// Netscape cookie file handed to yt-dlp
    pub cookies_file: Option<PathBuf>,
    /// Limit for a single yt-dlp run, from YTDL_TIMEOUT_SECS
    pub timeout: Duration,
}

impl ExtractorConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cookies_file = match non_empty("YTDL_COOKIES_FILE") {
            Some(path) => Some(PathBuf::from(shellexpand::tilde(&path).to_string())),
            None => find_default_cookies_file(),
        };

        let timeout_secs = parse_or(&non_empty, "YTDL_TIMEOUT_SECS", download::YTDLP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Config("YTDL_TIMEOUT_SECS must be greater than 0".to_string()));
        }

        Ok(Self {
            ytdl_bin: non_empty("YTDL_BIN").unwrap_or_else(|| "yt-dlp".to_string()),
            downloads_dir: PathBuf::from(
                shellexpand::tilde(&non_empty("DOWNLOAD_FOLDER").unwrap_or_else(|| "downloads".to_string())).to_string(),
            ),
            video_format: non_empty("VIDEO_FORMAT").unwrap_or_else(|| download::DEFAULT_FORMAT.to_string()),
            cookies_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Cookie file to pass to yt-dlp, only when it actually exists on disk
    pub fn usable_cookies_file(&self) -> Option<&Path> {
        self.cookies_file.as_deref().filter(|p| p.exists())
    }
}

/// Runtime configuration for the bot, read once at startup.
#[derive(Debug)]
pub struct BotConfig {
    /// Bot token from BOT_TOKEN (or TELOXIDE_TOKEN)
    pub bot_token: SecretString,
    /// Custom Bot API server from BOT_API_URL
    pub bot_api_url: Option<Url>,
    pub extractor: ExtractorConfig,
    /// Caption budget from CAPTION_MAX_LENGTH
    pub caption_max_length: usize,
    /// Link cache trim threshold from LINK_CACHE_CAPACITY
    pub link_cache_capacity: usize,
    /// Entries kept after a trim, from LINK_CACHE_RETAIN
    pub link_cache_retain: usize,
}

impl BotConfig {
    /// Create configuration from environment variables.
    ///
    /// Call [`load_env_files`] first so `.env` values are visible.
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = non_empty("BOT_TOKEN")
            .or_else(|| non_empty("TELOXIDE_TOKEN"))
            .ok_or_else(|| AppError::Config("BOT_TOKEN not found in environment variables".to_string()))?;

        let bot_api_url = non_empty("BOT_API_URL")
            .map(|raw| Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid BOT_API_URL: {}", e))))
            .transpose()?;

        let caption_max_length = parse_or(&non_empty, "CAPTION_MAX_LENGTH", DEFAULT_CAPTION_MAX_LENGTH)?;
        if caption_max_length < 4 {
            return Err(AppError::Config(format!(
                "CAPTION_MAX_LENGTH must be at least 4, got {}",
                caption_max_length
            )));
        }

        let link_cache_capacity = parse_or(&non_empty, "LINK_CACHE_CAPACITY", link_cache::CAPACITY)?;
        let link_cache_retain = parse_or(&non_empty, "LINK_CACHE_RETAIN", link_cache::RETAIN)?;
        if link_cache_capacity == 0 || link_cache_retain > link_cache_capacity {
            return Err(AppError::Config(format!(
                "LINK_CACHE_RETAIN ({}) must not exceed a non-zero LINK_CACHE_CAPACITY ({})",
                link_cache_retain, link_cache_capacity
            )));
        }

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            bot_api_url,
            extractor: ExtractorConfig::from_vars(&var)?,
            caption_max_length,
            link_cache_capacity,
            link_cache_retain,
        })
    }

    /// Last characters of the token, safe to put in a log line
    pub fn masked_token(&self) -> String {
        let token = self.bot_token.expose_secret();
        let tail: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a positive integer, got '{}'", key, raw))),
        None => Ok(default),
    }
}

/// Looks for cookies in the secrets directory first, then the working directory.
fn find_default_cookies_file() -> Option<PathBuf> {
    [Path::new(SECRETS_DIR).join(COOKIES_FILE_NAME), PathBuf::from(COOKIES_FILE_NAME)]
        .into_iter()
        .find(|p| p.exists())
        .map(|p| p.canonicalize().unwrap_or(p))
}

/// Logs the effective configuration at startup
pub fn log_configuration(config: &BotConfig) {
    log::info!("Bot token: {}", config.masked_token());
    let extractor = &config.extractor;
    log::info!("yt-dlp binary: {}", extractor.ytdl_bin);
    log::info!("Downloads directory: {}", extractor.downloads_dir.display());
    log::info!("Video format: {}", extractor.video_format);
    log::info!("yt-dlp timeout: {}s", extractor.timeout.as_secs());
    log::info!("Caption limit: {} characters", config.caption_max_length);

    match (&extractor.cookies_file, extractor.usable_cookies_file()) {
        (Some(_), Some(path)) => log::info!("✅ Cookies file: {}", path.display()),
        (Some(path), None) => log::warn!("⚠️  Cookies file {} not found, downloading without cookies", path.display()),
        (None, _) => log::info!("No cookies file configured"),
    }

    if let Some(url) = &config.bot_api_url {
        log::info!("Using custom Bot API URL: {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = BotConfig::from_vars(vars(&[])).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_vars(vars(&[("BOT_TOKEN", "123:abcdef")])).unwrap();
        assert_eq!(config.extractor.ytdl_bin, "yt-dlp");
        assert_eq!(config.extractor.downloads_dir, PathBuf::from("downloads"));
        assert_eq!(config.extractor.video_format, "mp4/best");
        assert_eq!(config.caption_max_length, 1024);
        assert_eq!(config.link_cache_capacity, 100);
        assert_eq!(config.link_cache_retain, 50);
        assert!(config.bot_api_url.is_none());
        assert_eq!(config.masked_token(), "...cdef");
    }

    #[test]
    fn test_teloxide_token_fallback() {
        let config = BotConfig::from_vars(vars(&[("TELOXIDE_TOKEN", "42:xyz")])).unwrap();
        assert_eq!(config.bot_token.expose_secret(), "42:xyz");
    }

    #[test]
    fn test_overrides() {
        let config = BotConfig::from_vars(vars(&[
            ("BOT_TOKEN", "t"),
            ("YTDL_BIN", "/usr/local/bin/yt-dlp"),
            ("DOWNLOAD_FOLDER", "/var/tmp/reels"),
            ("VIDEO_FORMAT", "best[height<=720]"),
            ("CAPTION_MAX_LENGTH", "200"),
            ("BOT_API_URL", "http://localhost:8081"),
        ]))
        .unwrap();
        assert_eq!(config.extractor.ytdl_bin, "/usr/local/bin/yt-dlp");
        assert_eq!(config.extractor.downloads_dir, PathBuf::from("/var/tmp/reels"));
        assert_eq!(config.extractor.video_format, "best[height<=720]");
        assert_eq!(config.caption_max_length, 200);
        assert_eq!(
            config.bot_api_url.as_ref().map(Url::as_str),
            Some("http://localhost:8081/")
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(BotConfig::from_vars(vars(&[("BOT_TOKEN", "t"), ("CAPTION_MAX_LENGTH", "lots")])).is_err());
        assert!(BotConfig::from_vars(vars(&[("BOT_TOKEN", "t"), ("CAPTION_MAX_LENGTH", "2")])).is_err());
        assert!(BotConfig::from_vars(vars(&[
            ("BOT_TOKEN", "t"),
            ("LINK_CACHE_CAPACITY", "10"),
            ("LINK_CACHE_RETAIN", "20"),
        ]))
        .is_err());
    }

    #[test]
    fn test_extractor_config_needs_no_token() {
        let config = ExtractorConfig::from_vars(vars(&[("YTDL_BIN", "/opt/yt-dlp")])).unwrap();
        assert_eq!(config.ytdl_bin, "/opt/yt-dlp");
        assert_eq!(config.video_format, "mp4/best");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_extractor_timeout() {
        let config = ExtractorConfig::from_vars(vars(&[("YTDL_TIMEOUT_SECS", "45")])).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(45));

        assert!(ExtractorConfig::from_vars(vars(&[("YTDL_TIMEOUT_SECS", "0")])).is_err());
        assert!(ExtractorConfig::from_vars(vars(&[("YTDL_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_explicit_cookies_file_only_used_when_present() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = BotConfig::from_vars(vars(&[("BOT_TOKEN", "t"), ("YTDL_COOKIES_FILE", path.as_str())])).unwrap();
        assert_eq!(config.extractor.usable_cookies_file(), Some(file.path()));

        let missing = BotConfig::from_vars(vars(&[("BOT_TOKEN", "t"), ("YTDL_COOKIES_FILE", "/nonexistent/cookies.txt")]))
            .unwrap();
        assert!(missing.extractor.cookies_file.is_some());
        assert!(missing.extractor.usable_cookies_file().is_none());
    }
}
