//! Error taxonomy for the rates client and the components built on it.

use thiserror::Error;

/// Failures surfaced by a [`RatesClient`](crate::core::rates::RatesClient) and
/// forwarded unchanged by the catalog and the reconciler.
#[derive(Error, Debug)]
pub enum RatesError {
    /// The endpoint URL could not be built. Points at a bad `base_url`.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with an empty body.
    #[error("No data in response")]
    NoData,

    /// The body was present but did not match the expected schema.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Network, DNS, TLS, timeout or HTTP status failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A newer refresh was issued before this one completed; its result was
    /// discarded.
    #[error("Request superseded by a newer refresh")]
    Superseded,
}

impl RatesError {
    /// True when the request never got a usable answer from the network.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
