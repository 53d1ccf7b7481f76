use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::core::error::{AppError, AppResult};
use crate::download::error::DownloadError;

/// How long `yt-dlp -U` may take
const UPDATE_TIMEOUT: Duration = Duration::from_secs(60);

/// yt-dlp exits with this code when it was installed through pip and
/// refuses to self-update
const PIP_INSTALLED_EXIT_CODE: i32 = 100;

/// Returns the installed yt-dlp version string.
pub async fn ytdlp_version(ytdl_bin: &str) -> AppResult<String> {
    let output = timeout(Duration::from_secs(15), Command::new(ytdl_bin).arg("--version").output())
        .await
        .map_err(|_| DownloadError::Timeout("yt-dlp --version timed out".to_string()))?
        .map_err(|e| DownloadError::Spawn(format!("Failed to run {}: {}", ytdl_bin, e)))?;

    if !output.status.success() {
        return Err(DownloadError::from_stderr(&String::from_utf8_lossy(&output.stderr)).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Runs `yt-dlp -U` and returns its report.
///
/// pip installs can't self-update; that case is an error with the command
/// to run instead.
pub async fn update_ytdlp(ytdl_bin: &str) -> AppResult<String> {
    log::info!("Checking for yt-dlp updates...");

    let output = timeout(UPDATE_TIMEOUT, Command::new(ytdl_bin).arg("-U").output())
        .await
        .map_err(|_| DownloadError::Timeout(format!("yt-dlp -U timed out after {}s", UPDATE_TIMEOUT.as_secs())))?
        .map_err(|e| DownloadError::Spawn(format!("Failed to run {}: {}", ytdl_bin, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if output.status.success() {
        if stdout.contains("up to date") || stdout.contains("up-to-date") {
            log::info!("yt-dlp is already up to date");
        } else {
            log::info!("yt-dlp update: {}", stdout);
        }
        return Ok(stdout);
    }

    if output.status.code() == Some(PIP_INSTALLED_EXIT_CODE) {
        return Err(AppError::Config(
            "yt-dlp is installed via pip; run 'pip install --upgrade yt-dlp' instead".to_string(),
        ));
    }

    Err(DownloadError::from_stderr(&String::from_utf8_lossy(&output.stderr)).into())
}

/// Logs the yt-dlp version at startup. A missing binary is only a warning;
/// every download will report it again.
pub async fn log_ytdlp_version(ytdl_bin: &str) {
    match ytdlp_version(ytdl_bin).await {
        Ok(version) => log::info!("yt-dlp version: {}", version),
        Err(e) => log::warn!("Failed to get yt-dlp version from '{}': {}", ytdl_bin, e),
    }
}
