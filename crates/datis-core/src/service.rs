//! Request-scoped entry points shared by every trigger path.
//!
//! Text messages, commands, button callbacks and inline queries all go
//! through [`AtisService`]; none of them see a [`FetchError`] directly.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    domain::{CategoryFilter, StationCode, StationQuery},
    errors::FetchError,
    formatting::{FormattedOutput, RichText},
    ports::AtisSource,
    report::{ClassifiedReportSet, RawReport},
    resolver,
    stations::{format_station_list, normalize_station_codes},
};

/// Station key on `/all` records, in lookup order.
const STATION_FIELDS: [&str; 3] = ["airport", "icao", "station"];

#[derive(Clone)]
pub struct AtisService {
    source: Arc<dyn AtisSource>,
    max_len: usize,
}

impl AtisService {
    pub fn new(source: Arc<dyn AtisSource>, max_len: usize) -> Self {
        Self {
            source,
            max_len: max_len.max(1),
        }
    }

    /// One station's report, truncated to a single message.
    pub async fn report(&self, query: &StationQuery) -> FormattedOutput {
        let station = query.station;
        match self.source.fetch(&station).await {
            Ok(payload) => {
                tracing::debug!(%station, filter = ?query.filter, "resolving report");
                resolver::resolve(&station, &payload, query.filter, self.max_len)
            }
            Err(e) => {
                tracing::warn!(%station, error = %e, "report fetch failed");
                FormattedOutput::single(format!("Error fetching report for {station}."))
            }
        }
    }

    /// Every active station, one block each, packed into size-bounded chunks.
    pub async fn digest(&self) -> FormattedOutput {
        let payload = match self.source.fetch_all().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "digest fetch failed");
                return FormattedOutput::single("Error fetching all ATIS data.");
            }
        };

        let blocks: Vec<RichText> = group_by_station(payload.objects())
            .into_iter()
            .map(|(station, reports)| {
                let set = ClassifiedReportSet::classify(&reports);
                resolver::render(&station, &set, CategoryFilter::None)
            })
            .collect();

        if blocks.is_empty() {
            return FormattedOutput::single("No active ATIS reports available.");
        }

        tracing::debug!(stations = blocks.len(), "digest rendered");
        FormattedOutput::chunked(blocks, self.max_len)
    }

    /// Sorted, validated station codes from the upstream list.
    pub async fn station_codes(&self) -> Result<Vec<StationCode>, FetchError> {
        let raw = self.source.stations().await.map_err(|e| {
            tracing::warn!(error = %e, "station list fetch failed");
            e
        })?;
        Ok(normalize_station_codes(raw))
    }

    /// Plain-text station list reply.
    pub async fn station_list(&self) -> FormattedOutput {
        match self.station_codes().await {
            Ok(codes) if codes.is_empty() => FormattedOutput::single("No stations available."),
            Ok(codes) => {
                let text = format!("Supported ICAO stations:\n{}", format_station_list(&codes));
                FormattedOutput::truncated(RichText::from(text), self.max_len)
            }
            Err(_) => FormattedOutput::single("Error fetching station list."),
        }
    }
}

/// Group `/all` records by station, first-seen order, dropping noise.
fn group_by_station(objects: Vec<&Map<String, Value>>) -> Vec<(StationCode, Vec<RawReport>)> {
    let mut groups: Vec<(StationCode, Vec<RawReport>)> = Vec::new();

    for obj in objects {
        let Some(station) = STATION_FIELDS
            .iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .and_then(|s| StationCode::parse(s).ok())
        else {
            continue;
        };
        let Some(report) = RawReport::from_object(obj) else {
            continue;
        };

        match groups.iter_mut().find(|(s, _)| *s == station) {
            Some((_, reports)) => reports.push(report),
            None => groups.push((station, vec![report])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::report::RawPayload;

    #[derive(Default)]
    struct FakeSource {
        reports: HashMap<String, Value>,
        stations: Option<Vec<String>>,
        all: Option<Value>,
    }

    fn down() -> FetchError {
        FetchError::Status {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[async_trait]
    impl AtisSource for FakeSource {
        async fn fetch(&self, station: &StationCode) -> Result<RawPayload, FetchError> {
            self.reports
                .get(station.as_str())
                .cloned()
                .map(RawPayload::from)
                .ok_or_else(down)
        }

        async fn stations(&self) -> Result<Vec<String>, FetchError> {
            self.stations.clone().ok_or_else(down)
        }

        async fn fetch_all(&self) -> Result<RawPayload, FetchError> {
            self.all.clone().map(RawPayload::from).ok_or_else(down)
        }
    }

    fn service(source: FakeSource, max_len: usize) -> AtisService {
        AtisService::new(Arc::new(source), max_len)
    }

    fn query(s: &str) -> StationQuery {
        StationQuery::parse(s).unwrap()
    }

    #[tokio::test]
    async fn report_resolves_payload() {
        let mut source = FakeSource::default();
        source.reports.insert(
            "KSLC".to_string(),
            json!({"category": "combined", "text": "wind calm"}),
        );
        let out = service(source, 4000).report(&query("kslc")).await;
        assert_eq!(out.plain_chunks(), vec!["KSLC ATIS (COMBINED):\n\n`wind calm`"]);
    }

    #[tokio::test]
    async fn report_fetch_failure_becomes_message() {
        let out = service(FakeSource::default(), 4000)
            .report(&query("KJFK arr"))
            .await;
        assert_eq!(out.plain_chunks(), vec!["Error fetching report for KJFK."]);
    }

    #[tokio::test]
    async fn digest_groups_by_station_in_order() {
        let source = FakeSource {
            all: Some(json!([
                {"airport": "KLAX", "type": "dep", "datis": "lax dep"},
                {"airport": "KSLC", "type": "combined", "datis": "slc"},
                {"airport": "KLAX", "type": "arr", "datis": "lax arr"},
                {"type": "combined", "datis": "no station"},
                {"airport": "KBOS"},
            ])),
            ..FakeSource::default()
        };
        let out = service(source, 4000).digest().await.plain_chunks();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0],
            "KLAX ATIS:\n\n[DEPARTURE]\n`lax dep`\n\n[ARRIVAL]\n`lax arr`\n\n\
             KSLC ATIS (COMBINED):\n\n`slc`"
        );
    }

    #[tokio::test]
    async fn digest_splits_between_station_blocks() {
        let body = "x".repeat(60);
        let records: Vec<Value> = ["KAAA", "KBBB", "KCCC"]
            .iter()
            .map(|s| json!({"icao": s, "text": body}))
            .collect();
        let source = FakeSource {
            all: Some(Value::Array(records)),
            ..FakeSource::default()
        };
        let out = service(source, 100).digest().await.plain_chunks();
        assert_eq!(out.len(), 3);
        assert!(out[0].starts_with("KAAA ATIS (COMBINED)"));
        assert!(out[2].starts_with("KCCC ATIS (COMBINED)"));
        assert!(out.iter().all(|c| c.chars().count() <= 100));
    }

    #[tokio::test]
    async fn digest_empty_and_error() {
        let source = FakeSource {
            all: Some(json!([])),
            ..FakeSource::default()
        };
        assert_eq!(
            service(source, 4000).digest().await.plain_chunks(),
            vec!["No active ATIS reports available."]
        );
        assert_eq!(
            service(FakeSource::default(), 4000).digest().await.plain_chunks(),
            vec!["Error fetching all ATIS data."]
        );
    }

    #[tokio::test]
    async fn station_list_is_sorted() {
        let source = FakeSource {
            stations: Some(vec!["klax".into(), "kjfk".into(), "kord".into()]),
            ..FakeSource::default()
        };
        assert_eq!(
            service(source, 4000).station_list().await.plain_chunks(),
            vec!["Supported ICAO stations:\nKJFK, KLAX, KORD"]
        );
    }

    #[tokio::test]
    async fn station_list_failure_and_empty() {
        assert_eq!(
            service(FakeSource::default(), 4000)
                .station_list()
                .await
                .plain_chunks(),
            vec!["Error fetching station list."]
        );
        let source = FakeSource {
            stations: Some(Vec::new()),
            ..FakeSource::default()
        };
        assert_eq!(
            service(source, 4000).station_list().await.plain_chunks(),
            vec!["No stations available."]
        );
    }
}
