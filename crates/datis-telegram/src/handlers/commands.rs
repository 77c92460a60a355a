use datis_core::domain::{CategoryFilter, ChatId, StationCode, StationQuery};

use crate::handlers::reply::{log_failure, send_chunks, send_report, send_station_page};
use crate::router::AppState;

const WELCOME: &str = "Welcome to the DATIS Bot!\n\n\
You can:\n\
• Send a 4-letter ICAO code (e.g. KLAX) to get ATIS\n\
• Add arr or dep (e.g. KLAX dep) for a single report type\n\
• Use /atis ICAO [arr|dep], /arr ICAO or /dep ICAO\n\
• Use /all to get all ATIS reports\n\
• Use /stations to pick from supported ICAOs (/list for plain text)\n\
• Type @bot-name KLAX in any chat for an inline report";

const INVALID_CODE: &str = "Invalid ICAO code. Send 4 letters, e.g. KLAX.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Report(StationQuery),
    Usage(&'static str),
    Invalid,
    All,
    Stations(usize),
    List,
    Unknown(String),
}

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub(crate) fn classify_command(text: &str) -> Command {
    let (cmd, args) = parse_command(text);

    let filtered = |filter: CategoryFilter, usage: &'static str| {
        if args.is_empty() {
            return Command::Usage(usage);
        }
        match StationCode::parse(&args) {
            Ok(station) => Command::Report(StationQuery::new(station, filter)),
            Err(_) => Command::Invalid,
        }
    };

    match cmd.as_str() {
        "start" | "help" => Command::Help,
        "atis" if args.is_empty() => Command::Usage("Usage: /atis <ICAO> [arr|dep]"),
        "atis" => StationQuery::parse(&args)
            .map(Command::Report)
            .unwrap_or(Command::Invalid),
        "arr" => filtered(CategoryFilter::Arrival, "Usage: /arr <ICAO>"),
        "dep" => filtered(CategoryFilter::Departure, "Usage: /dep <ICAO>"),
        "all" => Command::All,
        "stations" => {
            // Users count pages from 1.
            let page = args.parse::<usize>().unwrap_or(1).saturating_sub(1);
            Command::Stations(page)
        }
        "list" => Command::List,
        other => Command::Unknown(other.to_string()),
    }
}

pub async fn handle_command(state: &AppState, chat_id: ChatId, text: &str) {
    let command = classify_command(text);
    tracing::info!(chat = chat_id.0, ?command, "command");

    match command {
        Command::Help => log_failure("send", state.messenger.send_html(chat_id, WELCOME).await),
        Command::Report(query) => send_report(state, chat_id, query).await,
        Command::Usage(usage) => {
            let html = datis_core::formatting::escape_html(usage);
            log_failure("send", state.messenger.send_html(chat_id, &html).await);
        }
        Command::Invalid => {
            log_failure("send", state.messenger.send_html(chat_id, INVALID_CODE).await)
        }
        Command::All => send_chunks(state, chat_id, state.service.digest().await).await,
        Command::Stations(page) => send_station_page(state, chat_id, page).await,
        Command::List => send_chunks(state, chat_id, state.service.station_list().await).await,
        Command::Unknown(_) => log_failure(
            "send",
            state
                .messenger
                .send_html(chat_id, "Unknown command. Try /help.")
                .await,
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::handlers::reply::tests::{state, Recorder, Sent};

    use super::*;

    fn report(code: &str, filter: CategoryFilter) -> Command {
        Command::Report(StationQuery::new(StationCode::parse(code).unwrap(), filter))
    }

    #[test]
    fn parses_command_with_bot_suffix() {
        assert_eq!(
            parse_command("/atis@datis_bot klax arr"),
            ("atis".to_string(), "klax arr".to_string())
        );
    }

    #[test]
    fn classifies_report_commands() {
        assert_eq!(classify_command("/atis klax"), report("KLAX", CategoryFilter::None));
        assert_eq!(
            classify_command("/ATIS KLAX dep"),
            report("KLAX", CategoryFilter::Departure)
        );
        assert_eq!(classify_command("/arr kjfk"), report("KJFK", CategoryFilter::Arrival));
        assert_eq!(classify_command("/dep KJFK"), report("KJFK", CategoryFilter::Departure));
    }

    #[test]
    fn classifies_bad_input() {
        assert!(matches!(classify_command("/atis"), Command::Usage(_)));
        assert!(matches!(classify_command("/arr"), Command::Usage(_)));
        assert_eq!(classify_command("/atis LAX"), Command::Invalid);
        assert_eq!(classify_command("/dep KJFK arr"), Command::Invalid);
        assert_eq!(
            classify_command("/weather"),
            Command::Unknown("weather".to_string())
        );
    }

    #[test]
    fn classifies_listing_commands() {
        assert_eq!(classify_command("/start"), Command::Help);
        assert_eq!(classify_command("/all"), Command::All);
        assert_eq!(classify_command("/stations"), Command::Stations(0));
        assert_eq!(classify_command("/stations 3"), Command::Stations(2));
        assert_eq!(classify_command("/stations 0"), Command::Stations(0));
        assert_eq!(classify_command("/list"), Command::List);
    }

    #[tokio::test]
    async fn list_and_digest_replies() {
        let rec = Arc::new(Recorder::default());
        let st = state(rec.clone());

        handle_command(&st, ChatId(1), "/list").await;
        handle_command(&st, ChatId(1), "/all").await;
        handle_command(&st, ChatId(1), "/atis KBOS").await;

        let sent = rec.take();
        assert_eq!(
            sent[0],
            Sent::Html("Supported ICAO stations:\nKJFK, KLAX, KSLC".to_string())
        );
        assert_eq!(
            sent[1],
            Sent::Html("No active ATIS reports available.".to_string())
        );
        assert_eq!(sent[2], Sent::Action);
        assert!(matches!(
            &sent[3],
            Sent::Keyboard(html, _) if html == "Error fetching report for KBOS."
        ));
    }
}
