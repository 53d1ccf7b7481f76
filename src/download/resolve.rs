//! Share-link resolution.
//!
//! Instagram "share" links (`/share/reel/...`) redirect to the canonical
//! `/reel/...` page. yt-dlp handles the canonical form much more reliably,
//! so the redirect is followed before handing the URL over.

use reqwest::Client;

use crate::core::config;
use crate::core::error::AppResult;

/// Marker of links that need a redirect hop first
const SHARE_REEL_MARKER: &str = "/share/reel/";

/// Returns the final URL behind an Instagram share link.
///
/// Other URLs are returned unchanged. Any failure (client setup, network,
/// timeout) falls back to the original URL.
pub async fn resolve_share_url(url: &str) -> String {
    if !url.contains(SHARE_REEL_MARKER) {
        return url.to_string();
    }

    match follow_redirects(url).await {
        Ok(resolved) => {
            log::info!("Resolved share link {} -> {}", url, resolved);
            resolved
        }
        Err(e) => {
            log::warn!("Failed to resolve share link {}: {}. Using it as is.", url, e);
            url.to_string()
        }
    }
}

/// Sends a HEAD request and returns the URL the redirects ended on.
async fn follow_redirects(url: &str) -> AppResult<String> {
    let client = Client::builder().timeout(config::resolve::timeout()).build()?;
    let response = client.head(url).send().await?;
    Ok(response.url().to_string())
}
