//! Report selection and rendering.
//!
//! Each advisory body becomes a code span of the returned [`RichText`]; a
//! record without text shows up as `(no text)` instead.

use crate::{
    domain::{CategoryFilter, StationCode},
    formatting::{FormattedOutput, RichText},
    report::{ClassifiedReportSet, RawPayload},
};

const NO_TEXT: &str = "(no text)";

/// Classify `payload` and render it for `station`, truncated to `max_len`.
pub fn resolve(
    station: &StationCode,
    payload: &RawPayload,
    filter: CategoryFilter,
    max_len: usize,
) -> FormattedOutput {
    let set = ClassifiedReportSet::from_payload(payload);
    FormattedOutput::truncated(render(station, &set, filter), max_len)
}

/// Apply the selection/fallback policy to an already classified set.
pub fn render(station: &StationCode, set: &ClassifiedReportSet, filter: CategoryFilter) -> RichText {
    match filter {
        CategoryFilter::Arrival => render_filtered(station, set, &set.arrival, "ARR"),
        CategoryFilter::Departure => render_filtered(station, set, &set.departure, "DEP"),
        CategoryFilter::None => render_unfiltered(station, set),
    }
}

fn render_filtered(
    station: &StationCode,
    set: &ClassifiedReportSet,
    matching: &[String],
    label: &str,
) -> RichText {
    if !matching.is_empty() {
        let mut out = RichText::from(format!("{station} ATIS ({label}):\n\n"));
        push_bodies(&mut out, matching);
        return out;
    }

    if let Some(first) = set.combined.first() {
        let mut out = RichText::from(format!(
            "No {label} report for {station}. Showing COMBINED instead:\n\n"
        ));
        push_body(&mut out, first);
        return out;
    }

    RichText::from(format!(
        "No {label} report available for {station}. (No combined available for fallback)"
    ))
}

fn render_unfiltered(station: &StationCode, set: &ClassifiedReportSet) -> RichText {
    if set.total() == 1 {
        if let Some(only) = set.combined.first() {
            let mut out = RichText::from(format!("{station} ATIS (COMBINED):\n\n"));
            push_body(&mut out, only);
            return out;
        }
    }

    let section = |title: &str, texts: &[String]| {
        let mut out = RichText::from(format!("[{title}]\n"));
        push_bodies(&mut out, texts);
        out
    };

    let mut sections: Vec<RichText> = Vec::new();
    if !set.departure.is_empty() {
        sections.push(section("DEPARTURE", &set.departure));
    }
    if !set.arrival.is_empty() {
        sections.push(section("ARRIVAL", &set.arrival));
    }

    let has_split = !set.arrival.is_empty() || !set.departure.is_empty();
    let extra_combined = set.combined.len() > 1 || (set.combined.len() == 1 && has_split);
    if extra_combined {
        sections.push(section("OTHER COMBINED REPORTS", &set.combined));
    }

    if sections.is_empty() {
        return RichText::from(format!("No report found for {station}."));
    }

    let mut out = RichText::from(format!("{station} ATIS:\n\n"));
    for (i, s) in sections.into_iter().enumerate() {
        if i > 0 {
            out.push_text("\n\n");
        }
        out.append(s);
    }
    out
}

fn push_body(out: &mut RichText, text: &str) {
    if text.trim().is_empty() {
        out.push_text(NO_TEXT);
    } else {
        out.push_code(text);
    }
}

fn push_bodies(out: &mut RichText, texts: &[String]) {
    for (i, t) in texts.iter().enumerate() {
        if i > 0 {
            out.push_text("\n\n");
        }
        push_body(out, t);
    }
}
