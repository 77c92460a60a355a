use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{
        InlineQuery, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
        InputMessageContentText, ParseMode,
    },
};

use datis_core::{
    callback::CallbackAction,
    domain::StationQuery,
    formatting::{truncate_chars, RichText},
};

use crate::router::AppState;

const DESCRIPTION_LEN: usize = 100;

/// Inline results are short-lived; ATIS letters change hourly.
const CACHE_SECONDS: u32 = 60;

/// Title, description and body of the single inline result.
pub(crate) struct InlineArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub text: RichText,
}

pub(crate) async fn build_article(state: &AppState, query: StationQuery) -> InlineArticle {
    let text = state.service.report(&query).await.joined();
    let title = match query.filter.label() {
        Some(label) => format!("{} ATIS ({label})", query.station),
        None => format!("{} ATIS", query.station),
    };
    let body = match text.first_code() {
        Some(code) => code.to_string(),
        None => text.plain(),
    };

    InlineArticle {
        id: CallbackAction::Report(query).encode(),
        title,
        description: truncate_chars(&body, DESCRIPTION_LEN),
        text,
    }
}

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let results: Vec<InlineQueryResult> = match StationQuery::parse(&q.query) {
        Ok(query) => {
            let article = build_article(&state, query).await;
            let html = article.text.html_bounded(state.cfg.telegram_message_limit);
            let content = InputMessageContent::Text(
                InputMessageContentText::new(html).parse_mode(ParseMode::Html),
            );
            vec![InlineQueryResult::Article(
                InlineQueryResultArticle::new(article.id, article.title, content)
                    .description(article.description),
            )]
        }
        // Still typing, or not a station code.
        Err(_) => Vec::new(),
    };

    if let Err(e) = bot
        .answer_inline_query(q.id, results)
        .cache_time(CACHE_SECONDS)
        .await
    {
        tracing::warn!(error = %e, "answer inline query failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::handlers::reply::tests::{state, Recorder};

    use super::*;

    #[tokio::test]
    async fn article_for_station() {
        let st = state(Arc::new(Recorder::default()));
        let article = build_article(&st, StationQuery::parse("kslc").unwrap()).await;

        assert_eq!(article.id, "atis:KSLC");
        assert_eq!(article.title, "KSLC ATIS");
        assert_eq!(article.description, "wind <calm>");
        assert_eq!(article.text.plain(), "KSLC ATIS (COMBINED):\n\n`wind <calm>`");
    }

    #[tokio::test]
    async fn article_keeps_body_backticks() {
        let st = state(Arc::new(Recorder::default()));
        let article = build_article(&st, StationQuery::parse("KDEN dep").unwrap()).await;

        assert_eq!(article.description, "RWY `34L` CLSD");
        assert_eq!(
            article.text.html(),
            "KDEN ATIS (DEP):\n\n<code>RWY `34L` CLSD</code>"
        );
    }

    #[tokio::test]
    async fn article_for_failed_fetch_uses_message() {
        let st = state(Arc::new(Recorder::default()));
        let article = build_article(&st, StationQuery::parse("KBOS dep").unwrap()).await;

        assert_eq!(article.id, "atis:KBOS:dep");
        assert_eq!(article.title, "KBOS ATIS (DEP)");
        assert_eq!(article.description, "Error fetching report for KBOS.");
    }
}
