use async_trait::async_trait;

use crate::{domain::StationCode, errors::FetchError, report::RawPayload};

/// Upstream source of ATIS advisories (the D-ATIS HTTP API in production).
///
/// Implementations perform a single attempt per call: no retries, no caching.
#[async_trait]
pub trait AtisSource: Send + Sync {
    /// Reports for one station. The code is already validated.
    async fn fetch(&self, station: &StationCode) -> Result<RawPayload, FetchError>;

    /// Every station code the upstream knows about, as returned.
    async fn stations(&self) -> Result<Vec<String>, FetchError>;

    /// Reports for all active stations, each record tagged with its station.
    async fn fetch_all(&self) -> Result<RawPayload, FetchError>;
}
