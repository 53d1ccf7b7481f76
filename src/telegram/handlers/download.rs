//! Text message flow: link in, video out

use teloxide::prelude::*;
use teloxide::types::{InputFile, Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::core::error::AppResult;
use crate::core::utils::{cleanup_file, ensure_downloads_dir, is_probable_url};
use crate::download::{resolve_share_url, DownloadedVideo};
use crate::telegram::messages;
use crate::telegram::reply::prepare_video_reply;

/// Handles a text message that should contain a video link.
///
/// Failures are reported by editing the status message; they never reach the
/// dispatcher.
pub(super) async fn handle_video_request(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let url = text.trim();

    if !is_probable_url(url) {
        bot.send_message(msg.chat.id, messages::INVALID_URL).await?;
        return Ok(());
    }

    log::info!("Download request from chat {}: {}", msg.chat.id, url);
    let status = bot.send_message(msg.chat.id, messages::DOWNLOADING).await?;

    if let Err(e) = deliver_video(bot, msg, &status, url, deps).await {
        log::error!("Failed to deliver {} to chat {}: {}", url, msg.chat.id, e);
        if let Err(edit_err) = bot
            .edit_message_text(msg.chat.id, status.id, messages::download_error(&e.user_message()))
            .await
        {
            log::warn!("Failed to report error to chat {}: {}", msg.chat.id, edit_err);
        }
    }

    Ok(())
}

async fn deliver_video(bot: &Bot, msg: &Message, status: &Message, url: &str, deps: &HandlerDeps) -> AppResult<()> {
    ensure_downloads_dir(&deps.config.extractor.downloads_dir)?;

    let url = resolve_share_url(url).await;
    let output_stem = uuid::Uuid::new_v4().simple().to_string();
    let video = deps.extractor.extract(&url, &output_stem).await?;
    log::info!(
        "{} saved {} to {}",
        deps.extractor.name(),
        video.webpage_url,
        video.file_path.display()
    );

    let sent = send_video(bot, msg, &video, deps).await;
    cleanup_file(&video.file_path);
    sent?;

    for message_id in [msg.id, status.id] {
        if let Err(e) = bot.delete_message(msg.chat.id, message_id).await {
            log::debug!("Could not delete message {} in chat {}: {}", message_id.0, msg.chat.id, e);
        }
    }

    Ok(())
}

async fn send_video(bot: &Bot, msg: &Message, video: &DownloadedVideo, deps: &HandlerDeps) -> AppResult<()> {
    let reply = prepare_video_reply(video, deps.config.caption_max_length, &deps.link_cache).await;

    let mut request = bot
        .send_video(msg.chat.id, InputFile::file(video.file_path.clone()))
        .caption(reply.caption)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }

    request.await?;
    Ok(())
}
