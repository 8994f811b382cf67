//! # Route Table
//!
//! Bidirectional mapping between symbolic route names and path patterns.
//!
//! The table is responsible for:
//! - Registering `name -> pattern` entries (placeholders use `{param}` syntax)
//! - Matching incoming request paths and extracting path parameters
//! - Reversing a route name plus parameters back into a concrete URL path,
//!   percent-encoded and prefixed with the application's mount path
//!
//! Patterns are compiled into anchored regexes once at registration; matching
//! tests the request path against the compiled patterns in registration order.
//! Reversal is a left inverse of matching: for every `(name, params)` pair
//! `resolve` accepts, matching the resolved path recovers the same pair.

mod core;

pub use core::{RouteMatch, RouteTable};
