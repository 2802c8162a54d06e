//! Error kinds surfaced by the router client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// No host configured before a network operation.
    #[error("Router host undefined.")]
    UndefinedHost,

    /// No Basic-Auth token resolved before a network operation.
    #[error("Router username/password undefined.")]
    UndefinedAuth,

    /// The router answered with `HTTP/1.1 401`.
    #[error("Router username/password invalid.")]
    InvalidAuth,

    /// No response from the transport, or a page we could not make sense of.
    #[error("Unknown response from router: {0}")]
    UnknownResponse(String),

    /// MAC clone requested without an explicit or stored MAC address.
    #[error("MAC address undefined.")]
    UndefinedMac,

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;
