//! Caption button presses

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::core::error::AppResult;
use crate::telegram::callback::VideoCallback;
use crate::telegram::messages;
use crate::telegram::reply::CaptionEdit;

/// Handles a `video:` button press on a delivered video.
pub(super) async fn handle_caption_callback(
    bot: &Bot,
    q: &CallbackQuery,
    data: &VideoCallback,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    if let Err(e) = apply_caption_choice(bot, q, data, deps).await {
        log::error!("Caption callback {} failed: {}", data.pack(), e);
        bot.answer_callback_query(q.id.clone())
            .text(messages::callback_error(&e.user_message()))
            .show_alert(true)
            .await?;
    }
    Ok(())
}

async fn apply_caption_choice(bot: &Bot, q: &CallbackQuery, data: &VideoCallback, deps: &HandlerDeps) -> AppResult<()> {
    let Some(original_link) = deps.link_cache.get(&data.url_id).await else {
        bot.answer_callback_query(q.id.clone())
            .text(messages::LINK_EXPIRED)
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(q.id.clone())
            .text(messages::MESSAGE_UNAVAILABLE)
            .show_alert(true)
            .await?;
        return Ok(());
    };
    let (chat_id, message_id) = (message.chat().id, message.id());

    let edit = CaptionEdit::for_action(data.action, &original_link);
    match &edit {
        CaptionEdit::DropKeyboard => {
            bot.edit_message_reply_markup(chat_id, message_id).await?;
        }
        CaptionEdit::ReplaceCaption(caption) => {
            bot.edit_message_caption(chat_id, message_id)
                .caption(caption.clone())
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    bot.answer_callback_query(q.id.clone()).text(edit.answer()).await?;
    deps.link_cache.remove(&data.url_id).await;
    log::info!("Caption {} for message {} in chat {}", data.action, message_id.0, chat_id);
    Ok(())
}
