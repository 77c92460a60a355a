//! Upstream payload normalization and report classification.
//!
//! The D-ATIS API is loosely typed: a lookup may answer with a single object or
//! an array of objects, and field names drifted over time. All of that shape
//! handling lives here; everything downstream works on [`RawReport`] lists and
//! the [`ClassifiedReportSet`].

use serde_json::{Map, Value};

/// Decoded upstream body, before flattening.
#[derive(Clone, Debug, PartialEq)]
pub enum RawPayload {
    Single(Map<String, Value>),
    Many(Vec<Value>),
    /// Scalars and `null`: no reports.
    Other(Value),
}

impl From<Value> for RawPayload {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => Self::Single(map),
            Value::Array(items) => Self::Many(items),
            other => Self::Other(other),
        }
    }
}

impl RawPayload {
    /// Flatten into report records in upstream order.
    ///
    /// Non-object elements are ignored, as are objects that carry neither a
    /// category nor a text.
    pub fn reports(&self) -> Vec<RawReport> {
        match self {
            Self::Single(map) => RawReport::from_object(map).into_iter().collect(),
            Self::Many(items) => items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(RawReport::from_object)
                .collect(),
            Self::Other(_) => Vec::new(),
        }
    }

    /// Raw object records, used by the digest to group by station.
    pub fn objects(&self) -> Vec<&Map<String, Value>> {
        match self {
            Self::Single(map) => vec![map],
            Self::Many(items) => items.iter().filter_map(Value::as_object).collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

/// One upstream advisory record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawReport {
    pub category: Option<String>,
    pub text: Option<String>,
}

impl RawReport {
    pub fn new(category: Option<&str>, text: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            text: text.map(str::to_string),
        }
    }

    /// Read a record from one JSON object, `None` when it is pure noise.
    pub fn from_object(obj: &Map<String, Value>) -> Option<Self> {
        let get = |k: &str| obj.get(k).and_then(|v| v.as_str());

        let category = get("category").or_else(|| get("type")).map(str::to_string);

        // Legacy schema nests the body as `{"atis": {"text": "..."}}`.
        let text = get("text")
            .or_else(|| get("datis"))
            .or_else(|| get("atis"))
            .or_else(|| {
                obj.get("atis")
                    .and_then(|a| a.get("text"))
                    .and_then(|t| t.as_str())
            })
            .map(str::to_string);

        if category.is_none() && text.is_none() {
            return None;
        }
        Some(Self { category, text })
    }

    pub fn category(&self) -> ReportCategory {
        ReportCategory::from_label(self.category.as_deref())
    }

    /// Empty when the record carries no text.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportCategory {
    Arrival,
    Departure,
    Combined,
}

impl ReportCategory {
    /// `arr` / `dep` (case-insensitive); everything else is combined.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("arr") => Self::Arrival,
            Some("dep") => Self::Departure,
            _ => Self::Combined,
        }
    }
}

/// Report texts bucketed by category, upstream order preserved per bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedReportSet {
    pub arrival: Vec<String>,
    pub departure: Vec<String>,
    pub combined: Vec<String>,
}

impl ClassifiedReportSet {
    pub fn classify(reports: &[RawReport]) -> Self {
        let mut set = Self::default();
        for r in reports {
            let text = r.text().to_string();
            match r.category() {
                ReportCategory::Arrival => set.arrival.push(text),
                ReportCategory::Departure => set.departure.push(text),
                ReportCategory::Combined => set.combined.push(text),
            }
        }
        set
    }

    pub fn from_payload(payload: &RawPayload) -> Self {
        Self::classify(&payload.reports())
    }

    pub fn total(&self) -> usize {
        self.arrival.len() + self.departure.len() + self.combined.len()
    }
}
