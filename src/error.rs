//! Error taxonomy for the dispatch core.
//!
//! Construction-time errors (`InvalidMountPath`, `InvalidPattern`) are meant to
//! stop startup. Request-time errors propagate into the recovery envelope and
//! surface as HTTP status codes; they never terminate the process.

use thiserror::Error;

/// Errors produced by route registration, URL reversal and the data-get path.
#[derive(Debug, Error)]
pub enum Error {
    /// URL reversal was requested for a name no route is registered under.
    /// Never silently defaulted: a wrong link is worse than an explicit failure.
    #[error("route not found: {name}")]
    RouteNotFound { name: String },

    /// URL reversal parameters do not satisfy the route's placeholders,
    /// either a placeholder was left unfilled or an unknown name was supplied.
    #[error("route `{name}`: parameter `{param}` does not satisfy the pattern")]
    UnsatisfiedParam { name: String, param: String },

    /// A route pattern failed to compile at registration time.
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The configured mount path is malformed (must be empty or start with `/`
    /// and not end with `/`).
    #[error("invalid mount path `{path}`")]
    InvalidMountPath { path: String },

    /// `get_data` was invoked with an unregistered name and no fixture
    /// fallback applied.
    #[error("not a handler: {name}")]
    NotAHandler { name: String },

    /// `get_data` was invoked with a name registered under a non-data shape.
    #[error("not a data handler: {name}")]
    NotADataHandler { name: String },
}
