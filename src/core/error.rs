use thiserror::Error;

/// Fallback message when a failure carries no server detail
pub const GENERIC_FAILURE: &str = "unknown error";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("push notifications not supported")]
    Unsupported,

    #[error("background agent registration failed: {0}")]
    Registration(String),

    /// Non-2xx response. `detail` is the server's `{detail}` string when it
    /// sent one.
    #[error("{}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Server { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("not subscribed to push notifications")]
    NotSubscribed,

    #[error("invalid application server key: {0}")]
    InvalidKey(String),

    #[error("platform error: {0}")]
    Platform(String),

    /// The trigger for this operation is disabled while a previous call is in
    /// flight.
    #[error("operation already in progress")]
    Busy,

    #[error("notification {0} is not awaiting this response")]
    NotActionable(String),
}

impl RelayError {
    pub fn platform(err: impl std::fmt::Display) -> Self {
        Self::Platform(err.to_string())
    }
}

/// Maps any failure to the message shown to the user. Server `detail` is
/// surfaced verbatim.
pub fn failure_detail(err: &RelayError) -> String {
    match err {
        RelayError::Server {
            detail: Some(detail),
            ..
        } if !detail.is_empty() => detail.clone(),
        RelayError::Server { .. } => GENERIC_FAILURE.to_string(),
        other => other.to_string(),
    }
}
