//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use super::caption::handle_caption_callback;
use super::commands::handle_start_command;
use super::download::handle_video_request;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::callback::VideoCallback;

/// Creates the dispatcher schema for the bot.
///
/// Order matters: commands first, so `/start` is never treated as a link.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps.clone()))
        .branch(callback_handler(deps))
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(|bot: Bot, msg: Message, cmd: Command| async move {
            match cmd {
                Command::Start => handle_start_command(&bot, &msg).await,
            }
        })
}

/// Any text that is not a known command; non-text messages fall through
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move { handle_video_request(&bot, &msg, &deps).await }
        })
}

/// Only `video:` payloads; anything else is left unanswered
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter_map(|q: CallbackQuery| q.data.as_deref().and_then(VideoCallback::unpack))
        .endpoint(move |bot: Bot, q: CallbackQuery, data: VideoCallback| {
            let deps = deps.clone();
            async move { handle_caption_callback(&bot, &q, &data, &deps).await }
        })
}
