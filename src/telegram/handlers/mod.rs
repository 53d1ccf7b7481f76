//! Telegram bot handler tree
//!
//! The dispatcher schema lives here so integration tests can build the same
//! handler tree as production code.

mod caption;
mod commands;
mod download;
mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
