use std::sync::Arc;

use teloxide::{prelude::*, types::CallbackQuery};

use datis_core::{
    callback::CallbackAction,
    domain::{ChatId, MessageId, MessageRef},
    formatting::escape_html,
};

use crate::handlers::reply::{log_failure, send_report, station_page};
use crate::router::AppState;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    handle_action(&state, &q.id, CallbackAction::parse(&data), message).await;
    Ok(())
}

/// Act on a parsed button press. Always answers the callback query.
pub(crate) async fn handle_action(
    state: &AppState,
    callback_id: &str,
    action: Option<CallbackAction>,
    message: Option<MessageRef>,
) {
    let answer = |text: Option<&'static str>| async move {
        log_failure(
            "answer callback",
            state.messenger.answer_callback_query(callback_id, text).await,
        );
    };

    // Buttons on inline-mode messages have no chat to reply into.
    let (Some(action), Some(msg)) = (action, message) else {
        answer(Some("Unknown action")).await;
        return;
    };

    match action {
        CallbackAction::Noop => answer(None).await,
        CallbackAction::Report(query) => {
            answer(None).await;
            tracing::info!(chat = msg.chat_id.0, station = %query.station, "button query");
            send_report(state, msg.chat_id, query).await;
        }
        CallbackAction::StationsPage(page) => match station_page(state, page).await {
            Ok(p) => {
                answer(None).await;
                let caption = escape_html(&p.caption());
                log_failure(
                    "edit stations",
                    state
                        .messenger
                        .edit_inline_keyboard(msg, &caption, p.keyboard)
                        .await,
                );
            }
            Err(_) => answer(Some("Error fetching station list.")).await,
        },
    }
}
