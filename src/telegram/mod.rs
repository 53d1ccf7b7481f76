//! Telegram bot integration: construction, handlers and inline buttons

pub mod bot;
pub mod callback;
pub mod handlers;
pub mod keyboard;
pub mod link_cache;
pub mod messages;
pub mod reply;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use link_cache::LinkCache;
pub use teloxide::Bot;
