//! Inline-button callback payloads.
//!
//! Telegram caps callback data at 64 bytes; every encoding here stays well
//! below that.

use crate::domain::{CategoryFilter, StationCode, StationQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Run a report query (`atis:KLAX`, `atis:KLAX:arr`).
    Report(StationQuery),
    /// Show a page of the station grid (`stations:3`).
    StationsPage(usize),
    /// Button with no effect (page indicator).
    Noop,
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            Self::Report(q) => match q.filter {
                CategoryFilter::None => format!("atis:{}", q.station),
                CategoryFilter::Arrival => format!("atis:{}:arr", q.station),
                CategoryFilter::Departure => format!("atis:{}:dep", q.station),
            },
            Self::StationsPage(page) => format!("stations:{page}"),
            Self::Noop => "noop".to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            ["noop"] => Some(Self::Noop),
            ["stations", page] => page.parse::<usize>().ok().map(Self::StationsPage),
            ["atis", station] => {
                let station = StationCode::parse(station).ok()?;
                Some(Self::Report(StationQuery::new(station, CategoryFilter::None)))
            }
            ["atis", station, filter] => {
                let station = StationCode::parse(station).ok()?;
                let filter = CategoryFilter::parse(filter)?;
                Some(Self::Report(StationQuery::new(station, filter)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(code: &str, filter: CategoryFilter) -> CallbackAction {
        CallbackAction::Report(StationQuery::new(StationCode::parse(code).unwrap(), filter))
    }

    #[test]
    fn encodes_report_queries() {
        assert_eq!(query("KLAX", CategoryFilter::None).encode(), "atis:KLAX");
        assert_eq!(query("KLAX", CategoryFilter::Arrival).encode(), "atis:KLAX:arr");
        assert_eq!(query("KLAX", CategoryFilter::Departure).encode(), "atis:KLAX:dep");
    }

    #[test]
    fn parses_known_payloads() {
        assert_eq!(
            CallbackAction::parse("atis:klax:dep"),
            Some(query("KLAX", CategoryFilter::Departure))
        );
        assert_eq!(
            CallbackAction::parse("stations:2"),
            Some(CallbackAction::StationsPage(2))
        );
        assert_eq!(CallbackAction::parse("noop"), Some(CallbackAction::Noop));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("atis:LAX"), None);
        assert_eq!(CallbackAction::parse("atis:KLAX:both"), None);
        assert_eq!(CallbackAction::parse("stations:-1"), None);
        assert_eq!(CallbackAction::parse("askuser:1:2"), None);
    }
}
