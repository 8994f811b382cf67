//! # Server layer
//!
//! `may_minihttp` integration: raw request parsing, the [`AppService`] that
//! delegates every request to the [`App`](crate::app::App), and the server
//! start/stop wrapper. The only place the network is touched; everything
//! above it works against [`ParsedRequest`] and
//! [`ResponseSink`](crate::response::ResponseSink).

pub mod http_server;
pub mod request;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, ParsedRequest};
pub use service::{flush_sink, AppService};
