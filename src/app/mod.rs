//! # App (Dispatcher)
//!
//! Composes the route table, handler table, session manager and recovery
//! envelope into the single request-dispatch path.
//!
//! Construction merges two registration sources (module-level and
//! deployment-level, deployment winning on name collision) into one immutable
//! route table and one immutable handler table; nothing is registered after
//! serving begins, so concurrent request coroutines read the App without
//! locking.
//!
//! Per request: recovery envelope opens, the route table matches the path,
//! the session loads, the controller resolver dispatches, the response applies
//! to the sink, the session saves, the envelope logs. Handlers without a
//! route stay reachable through [`App::get_data`] and the always-mounted
//! `/_internal/json/{handler}` endpoint.

mod core;

pub use core::{App, Registrations, INTERNAL_JSON_PATTERN, INTERNAL_JSON_ROUTE};
