use std::fmt;

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Error returned when parsing an invalid ICAO station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {input:?}: {reason}")]
pub struct InvalidStationCode {
    input: String,
    reason: &'static str,
}

/// A 4-letter ICAO airport identifier, always stored upper-cased.
///
/// Input is trimmed and upper-cased before validation, so `" klax "` parses
/// to `KLAX`. Anything that is not exactly four ASCII letters is rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 4]);

impl StationCode {
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let normalized = s.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();

        if bytes.len() != 4 {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be exactly 4 characters",
            });
        }
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be ASCII letters A-Z",
            });
        }

        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which report category the user asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    None,
    Arrival,
    Departure,
}

impl CategoryFilter {
    /// Parse a user token (`arr`, `arrival`, `dep`, `departure`), case-insensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "arr" | "arrival" => Some(Self::Arrival),
            "dep" | "departure" => Some(Self::Departure),
            _ => None,
        }
    }

    /// Short label used in headers and callback data.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Arrival => Some("ARR"),
            Self::Departure => Some("DEP"),
        }
    }
}

/// A validated request for one station's report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StationQuery {
    pub station: StationCode,
    pub filter: CategoryFilter,
}

impl StationQuery {
    pub fn new(station: StationCode, filter: CategoryFilter) -> Self {
        Self { station, filter }
    }

    /// Parse `"KLAX"`, `"klax arr"`, `"KSFO departure"`.
    ///
    /// An unrecognized second token is an error rather than silently ignored.
    pub fn parse(input: &str) -> Result<Self, InvalidStationCode> {
        let mut parts = input.split_whitespace();
        let station = StationCode::parse(parts.next().unwrap_or(""))?;

        let filter = match parts.next() {
            None => CategoryFilter::None,
            Some(tok) => CategoryFilter::parse(tok).ok_or_else(|| InvalidStationCode {
                input: input.to_string(),
                reason: "category must be arr or dep",
            })?,
        };

        if parts.next().is_some() {
            return Err(InvalidStationCode {
                input: input.to_string(),
                reason: "too many arguments",
            });
        }

        Ok(Self { station, filter })
    }
}
