use std::sync::Arc;

use datis_client::DatisClient;

use datis_core::{config::Config, service::AtisService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    datis_core::logging::init("datis")?;

    let cfg = Arc::new(Config::load()?);

    let source = Arc::new(DatisClient::new(cfg.api_base_url.clone())?);
    let service = AtisService::new(source, cfg.telegram_safe_limit);

    tracing::info!(
        max_len = cfg.telegram_safe_limit,
        stations_per_page = cfg.stations_per_page,
        "starting telegram polling"
    );

    datis_telegram::router::run_polling(cfg, service)
        .await
        .map_err(|e| anyhow::anyhow!("telegram bot failed: {e}"))?;

    Ok(())
}
