//! User-facing texts

use indoc::indoc;

/// Reply to `/start`, HTML
pub const START_TEXT: &str = indoc! {"
    👋 <b>Hi!</b>

    Send me a link to a video from Instagram, YouTube, TikTok and many other platforms, and I'll send the video back.

    When the video has a description you can keep it or clear it with the buttons under the video.
"};

pub const INVALID_URL: &str = "Please send me a valid URL.";
pub const DOWNLOADING: &str = "📥 Downloading video... Please wait ⏳";
pub const LINK_EXPIRED: &str = "❌ Link isn't available anymore";
pub const MESSAGE_UNAVAILABLE: &str = "❌ This message can't be edited anymore";
pub const CAPTION_KEPT: &str = "✅ Caption kept";
pub const CAPTION_CLEARED: &str = "✅ Caption cleared";

pub fn download_error(reason: &str) -> String {
    format!("❌ Error downloading video: {}", reason)
}

pub fn callback_error(reason: &str) -> String {
    format!("❌ Error: {}", reason)
}
