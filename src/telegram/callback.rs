//! Inline button payloads: `video:{action}:{url_id}`.

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumString};

/// Prefix shared by every payload this bot produces
pub const CALLBACK_PREFIX: &str = "video";

/// Telegram rejects callback data longer than this many bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// What to do with the caption of a delivered video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CaptionAction {
    /// Keep the description, just drop the buttons
    Keep,
    /// Replace the caption with the bare link line
    Remove,
}

/// Decoded button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCallback {
    pub action: CaptionAction,
    pub url_id: String,
}

impl VideoCallback {
    pub fn new(action: CaptionAction, url_id: impl Into<String>) -> Self {
        Self {
            action,
            url_id: url_id.into(),
        }
    }

    /// Encodes the payload for `InlineKeyboardButton::callback`
    pub fn pack(&self) -> String {
        format!("{}:{}:{}", CALLBACK_PREFIX, self.action, self.url_id)
    }

    /// Parses a payload produced by [`VideoCallback::pack`].
    ///
    /// Returns `None` for other prefixes, unknown actions or an empty id.
    pub fn unpack(data: &str) -> Option<Self> {
        let mut parts = data.splitn(3, ':');
        if parts.next()? != CALLBACK_PREFIX {
            return None;
        }
        let action = CaptionAction::from_str(parts.next()?).ok()?;
        let url_id = parts.next()?;
        if url_id.is_empty() || url_id.contains(':') {
            return None;
        }
        Some(Self::new(action, url_id))
    }
}
