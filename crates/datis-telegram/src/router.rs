use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use datis_core::{config::Config, messaging::port::MessagingPort, service::AtisService};

use crate::handlers;
use crate::TelegramMessenger;

/// Everything a handler needs, built once before the dispatcher starts.
///
/// Handlers receive it through dptree dependency injection, so there is no
/// global bot handle and no "not initialized yet" state to check per update.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: AtisService,
    pub messenger: Arc<dyn MessagingPort>,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, service: AtisService, messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            cfg,
            service,
            messenger,
        }
    }
}

pub async fn run_polling(cfg: Arc<Config>, service: AtisService) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "datis bot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed; continuing"),
    }
    tracing::info!(api = %cfg.api_base_url, "upstream");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState::new(cfg, service, messenger));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_inline_query().endpoint(handlers::handle_inline_query))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
