use thiserror::Error;

/// Errors that can occur when using the realtime transport client.
///
/// Note that per the transport's propagation policy, `send`, `subscribe` and
/// inbound dispatch never surface these — failures on those paths are logged
/// and absorbed. Only construction and the explicit `connect`/`disconnect`
/// calls return them.
#[derive(Error, Debug)]
pub enum RealtimeError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// General connection error with descriptive message
    #[error("Connection error: {0}")]
    Connection(String),

    /// URL parsing error (malformed origin or endpoint)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Convenience type alias for `Result<T, RealtimeError>`.
pub type Result<T> = std::result::Result<T, RealtimeError>;
