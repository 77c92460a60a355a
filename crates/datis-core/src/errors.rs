/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the core can
/// decide what is user-facing and what is only logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),
}

/// Failure of a single upstream lookup.
///
/// Always recovered at the service boundary and turned into a reply text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// Body was not valid JSON.
    #[error("upstream body is not valid json: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
