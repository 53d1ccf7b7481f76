//! What gets sent for a delivered video and what a caption button does to it.
//!
//! Kept apart from the handlers so the flow can be checked without a Bot API.

use teloxide::types::InlineKeyboardMarkup;

use crate::core::utils::{format_caption, link_line};
use crate::download::DownloadedVideo;
use crate::telegram::callback::CaptionAction;
use crate::telegram::keyboard::video_keyboard;
use crate::telegram::link_cache::LinkCache;
use crate::telegram::messages;

/// Caption and optional buttons for a `sendVideo` call
#[derive(Debug, Clone)]
pub struct VideoReply {
    pub caption: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Link cache id behind the buttons, if any
    pub url_id: Option<String>,
}

/// Builds the reply for `video`.
///
/// Buttons only make sense when there is a description to clear, so the link
/// cache is touched only in that case.
pub async fn prepare_video_reply(video: &DownloadedVideo, caption_max_length: usize, link_cache: &LinkCache) -> VideoReply {
    let caption = format_caption(&video.webpage_url, &video.description, caption_max_length);

    if !video.has_description() {
        return VideoReply {
            caption,
            keyboard: None,
            url_id: None,
        };
    }

    let url_id = link_cache.insert(&video.webpage_url).await;
    VideoReply {
        caption,
        keyboard: Some(video_keyboard(&url_id)),
        url_id: Some(url_id),
    }
}

/// Edit applied to the video message after a caption button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionEdit {
    /// Leave the caption, remove the buttons
    DropKeyboard,
    /// Set this caption (HTML) without buttons
    ReplaceCaption(String),
}

impl CaptionEdit {
    pub fn for_action(action: CaptionAction, original_link: &str) -> Self {
        match action {
            CaptionAction::Keep => Self::DropKeyboard,
            CaptionAction::Remove => Self::ReplaceCaption(link_line(original_link)),
        }
    }

    /// Callback answer shown once the edit went through
    pub fn answer(&self) -> &'static str {
        match self {
            Self::DropKeyboard => messages::CAPTION_KEPT,
            Self::ReplaceCaption(_) => messages::CAPTION_CLEARED,
        }
    }
}
