//! # Error Handling ([`Error`]) - crate-wide error type.
//!
//! Every fallible operation in this crate returns [`Result<T>`], a thin
//! alias over `std::result::Result<T, Error>`. [`Error`] groups failures the
//! way the resolution pipeline experiences them, not the way any one
//! underlying library reports them:
//!
//! - [`Error::Config`] - a required setting is missing or malformed
//!   (an API key, an OAuth secret, an invalid base URL).
//! - [`Error::Transport`] / [`Error::Reqwest`] - the HTTP layer failed after
//!   exhausting retries.
//! - [`Error::Remote`] - the remote service answered with an error status.
//! - [`Error::Parse`] - a response body could not be decoded; never fatal on
//!   its own, callers are expected to treat it as "unknown", not "zero".
//! - [`Error::Cache`] - the probe cache's on-disk file could not be read or
//!   appended to.
//! - [`Error::UnsupportedCapability`] - a provider was asked to do something
//!   it explicitly does not implement (e.g. EPO-style assignee discovery).

use thiserror::Error;

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the name-resolution pipeline and its collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value was missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP transport failed (connection, timeout, or retries exhausted).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// A direct `reqwest` failure, not routed through the middleware stack.
    #[error("transport error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The remote service responded with an error status.
    #[error("remote error: status {status} at {url}: {body_snippet}")]
    Remote {
        /// HTTP status code returned by the remote service.
        status: u16,
        /// URL that produced the error.
        url: String,
        /// First few hundred bytes of the response body, for diagnostics.
        body_snippet: String,
    },

    /// A response body could not be parsed in the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A URL failed to parse.
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The probe cache's backing file could not be read or written.
    #[error("cache I/O error: {0}")]
    Cache(#[from] std::io::Error),

    /// `serde_json` failed to (de)serialize a cache record or response body.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The requested capability is not implemented by this provider.
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),
}
