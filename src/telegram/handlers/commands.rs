//! Command handler implementations (/start)

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use super::types::HandlerError;
use crate::telegram::messages;

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::START_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
