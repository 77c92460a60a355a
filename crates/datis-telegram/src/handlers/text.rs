use std::sync::OnceLock;

use regex::Regex;

use datis_core::domain::{ChatId, StationQuery};

use crate::handlers::reply::send_report;
use crate::router::AppState;

/// `KLAX`, `klax dep`, `KSFO arrival`; anything else is chatter and ignored.
fn station_message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*[a-z]{4}(?:\s+(?:arr|dep|arrival|departure))?\s*$")
            .expect("valid regex")
    })
}

pub(crate) fn parse_station_message(text: &str) -> Option<StationQuery> {
    if !station_message_re().is_match(text) {
        return None;
    }
    StationQuery::parse(text).ok()
}

pub async fn handle_text(state: &AppState, chat_id: ChatId, text: &str) {
    let Some(query) = parse_station_message(text) else {
        tracing::debug!(chat = chat_id.0, "ignoring non-station text");
        return;
    };
    send_report(state, chat_id, query).await;
}

#[cfg(test)]
mod tests {
    use datis_core::domain::CategoryFilter;

    use super::*;

    #[test]
    fn recognizes_station_messages() {
        let q = parse_station_message(" klax ").unwrap();
        assert_eq!(q.station.as_str(), "KLAX");
        assert_eq!(q.filter, CategoryFilter::None);

        let q = parse_station_message("KSFO Departure").unwrap();
        assert_eq!(q.filter, CategoryFilter::Departure);
    }

    #[test]
    fn ignores_chatter() {
        assert!(parse_station_message("hello there").is_none());
        assert!(parse_station_message("hi").is_none());
        assert!(parse_station_message("KLAX please").is_none());
        assert!(parse_station_message("K1AX").is_none());
    }
}
