//! Supported-station list rendering: plain text and the paginated button grid.

use crate::{
    callback::CallbackAction,
    domain::{CategoryFilter, StationCode, StationQuery},
    messaging::types::{InlineButton, InlineKeyboard},
};

/// Buttons per grid row.
pub const GRID_COLUMNS: usize = 2;

/// Upper-case, validate, sort and de-duplicate upstream station codes.
///
/// Entries that are not 4-letter codes cannot be queried and are dropped.
pub fn normalize_station_codes<I, S>(raw: I) -> Vec<StationCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes: Vec<StationCode> = raw
        .into_iter()
        .filter_map(|s| StationCode::parse(s.as_ref()).ok())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

/// `KJFK, KLAX, KORD`
pub fn format_station_list(codes: &[StationCode]) -> String {
    codes
        .iter()
        .map(StationCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One page of the station picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationPage {
    /// Zero-based, clamped to the last page.
    pub page: usize,
    pub total_pages: usize,
    pub keyboard: InlineKeyboard,
}

impl StationPage {
    /// Build page `page` of a sorted code list, `per_page` stations each.
    pub fn build(codes: &[StationCode], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(GRID_COLUMNS);
        let total_pages = codes.len().div_ceil(per_page).max(1);
        let page = page.min(total_pages - 1);

        let buttons = codes
            .iter()
            .skip(page * per_page)
            .take(per_page)
            .map(|code| {
                let action =
                    CallbackAction::Report(StationQuery::new(*code, CategoryFilter::None));
                InlineButton::new(code.as_str(), &action)
            })
            .collect();
        let mut keyboard = InlineKeyboard::grid(buttons, GRID_COLUMNS);

        if total_pages > 1 {
            let mut nav = Vec::new();
            if page > 0 {
                nav.push(InlineButton::new(
                    "◀ Prev",
                    &CallbackAction::StationsPage(page - 1),
                ));
            }
            nav.push(InlineButton::new(
                format!("{}/{}", page + 1, total_pages),
                &CallbackAction::Noop,
            ));
            if page + 1 < total_pages {
                nav.push(InlineButton::new(
                    "Next ▶",
                    &CallbackAction::StationsPage(page + 1),
                ));
            }
            keyboard.push_row(nav);
        }

        Self {
            page,
            total_pages,
            keyboard,
        }
    }

    pub fn caption(&self) -> String {
        if self.total_pages > 1 {
            format!(
                "Supported ICAO stations (page {}/{}):",
                self.page + 1,
                self.total_pages
            )
        } else {
            "Supported ICAO stations:".to_string()
        }
    }
}
