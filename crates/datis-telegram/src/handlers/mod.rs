//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - extracts the station query from the update
//! - calls into the `datis-core` service
//! - sends the formatted reply through the messenger port
//!
//! Send failures are logged and swallowed so one bad update never stops the
//! dispatcher.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, InlineQuery, Message},
};

use crate::router::AppState;

mod callback;
mod commands;
mod inline;
mod reply;
mod text;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    inline::handle_inline_query(bot, q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = datis_core::domain::ChatId(msg.chat.id.0);

    if text.starts_with('/') {
        commands::handle_command(&state, chat_id, text).await;
    } else {
        text::handle_text(&state, chat_id, text).await;
    }

    Ok(())
}
