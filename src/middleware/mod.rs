//! # Recovery & Access-Log Middleware
//!
//! The per-request envelope: panic/fault recovery plus one structured access
//! log line per request. It runs regardless of the debug flag; debug only
//! controls whether recovered fault details are echoed into the response body.

mod recovery;

pub use recovery::AccessLog;
