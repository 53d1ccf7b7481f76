use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::telegram::callback::{CaptionAction, VideoCallback};

pub const KEEP_CAPTION_LABEL: &str = "✅ Keep caption";
pub const CLEAR_CAPTION_LABEL: &str = "❌ Clear caption";

/// One row with the two caption buttons for the video stored under `url_id`.
pub fn video_keyboard(url_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(KEEP_CAPTION_LABEL, VideoCallback::new(CaptionAction::Keep, url_id).pack()),
        InlineKeyboardButton::callback(
            CLEAR_CAPTION_LABEL,
            VideoCallback::new(CaptionAction::Remove, url_id).pack(),
        ),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn payloads(markup: &InlineKeyboardMarkup) -> Vec<(String, String)> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => (button.text.clone(), data.clone()),
                other => panic!("unexpected button kind: {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_single_row_keep_then_clear() {
        let markup = video_keyboard("0123456789abcdef");
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(
            payloads(&markup),
            vec![
                (KEEP_CAPTION_LABEL.to_string(), "video:keep:0123456789abcdef".to_string()),
                (CLEAR_CAPTION_LABEL.to_string(), "video:remove:0123456789abcdef".to_string()),
            ]
        );
    }
}
