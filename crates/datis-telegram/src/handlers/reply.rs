//! Reply shaping shared by every trigger path.

use datis_core::{
    callback::CallbackAction,
    domain::{CategoryFilter, ChatId, StationCode, StationQuery},
    formatting::{escape_html, FormattedOutput, RichText},
    messaging::types::{ChatAction, InlineButton, InlineKeyboard},
    stations::StationPage,
};

use crate::router::AppState;

pub(crate) fn log_failure<T>(what: &str, res: datis_core::Result<T>) {
    if let Err(e) = res {
        tracing::warn!(error = %e, "{what} failed");
    }
}

/// `[ARR] [DEP] [ALL]` re-query buttons under a report.
pub(crate) fn report_keyboard(station: StationCode) -> InlineKeyboard {
    let button = |label: &str, filter| {
        InlineButton::new(
            label,
            &CallbackAction::Report(StationQuery::new(station, filter)),
        )
    };
    InlineKeyboard::new(vec![vec![
        button("ARR", CategoryFilter::Arrival),
        button("DEP", CategoryFilter::Departure),
        button("ALL", CategoryFilter::None),
    ]])
}

/// Telegram HTML for one chunk, kept within the transport's message limit.
pub(crate) fn chunk_html(state: &AppState, chunk: &RichText) -> String {
    chunk.html_bounded(state.cfg.telegram_message_limit)
}

/// Send every chunk in order, as separate messages.
pub(crate) async fn send_chunks(state: &AppState, chat_id: ChatId, out: FormattedOutput) {
    for chunk in out {
        let html = chunk_html(state, &chunk);
        log_failure("send", state.messenger.send_html(chat_id, &html).await);
    }
}

/// Resolve one station query and reply, re-query buttons on the last chunk.
pub(crate) async fn send_report(state: &AppState, chat_id: ChatId, query: StationQuery) {
    log_failure(
        "chat action",
        state
            .messenger
            .send_chat_action(chat_id, ChatAction::Typing)
            .await,
    );

    let out = state.service.report(&query).await;
    let last = out.chunks().len().saturating_sub(1);
    for (i, chunk) in out.chunks().iter().enumerate() {
        let html = chunk_html(state, chunk);
        if i == last {
            log_failure(
                "send report",
                state
                    .messenger
                    .send_inline_keyboard(chat_id, &html, report_keyboard(query.station))
                    .await,
            );
        } else {
            log_failure("send report", state.messenger.send_html(chat_id, &html).await);
        }
    }
}

/// Fetch the station list and build the requested grid page.
pub(crate) async fn station_page(state: &AppState, page: usize) -> Result<StationPage, String> {
    match state.service.station_codes().await {
        Ok(codes) if codes.is_empty() => Err("No stations available.".to_string()),
        Ok(codes) => Ok(StationPage::build(&codes, page, state.cfg.stations_per_page)),
        Err(_) => Err("Error fetching station list.".to_string()),
    }
}

pub(crate) async fn send_station_page(state: &AppState, chat_id: ChatId, page: usize) {
    match station_page(state, page).await {
        Ok(p) => {
            let caption = escape_html(&p.caption());
            log_failure(
                "send stations",
                state
                    .messenger
                    .send_inline_keyboard(chat_id, &caption, p.keyboard)
                    .await,
            );
        }
        Err(msg) => log_failure("send", state.messenger.send_html(chat_id, &msg).await),
    }
}
