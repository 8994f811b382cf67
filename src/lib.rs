//! # Aileron
//!
//! **Aileron** is the request-dispatch core of a coroutine-powered web
//! framework: it receives an inbound HTTP request, resolves it to exactly one
//! of several heterogeneous handler shapes, executes that handler inside a
//! session-aware, panic-safe envelope, and reverses named routes back into
//! URLs.
//!
//! ## Architecture
//!
//! The library is organized into a small set of modules, leaves first:
//!
//! - **[`router`]** - Bidirectional `name <-> path pattern` route table with
//!   URL reversal
//! - **[`response`]** - The "apply yourself to the output sink" contract and
//!   the JSON-wrapping adapter
//! - **[`context`]** - Per-request carrier of parameters, session access and
//!   profiling scopes
//! - **[`dispatcher`]** - Capability-based dispatch over the fixed handler
//!   shapes
//! - **[`session`]** - Cookie-backed session load/save around every dispatch
//! - **[`middleware`]** - Recovery and access-log envelope
//! - **[`app`]** - The dispatcher composition: registration merge, the
//!   ServeHTTP-shaped entry point, URL reversal and the data-get path
//! - **[`server`]** - HTTP server built on `may_minihttp`
//! - **[`data`]** - Fixture fallback for the data-get path (debug builds)
//! - **[`render`]** - Rendering collaborator interface
//!
//! ## Request flow
//!
//! ```text
//! request -> recovery/access-log envelope opens
//!         -> route table matches the path
//!         -> session loads
//!         -> controller resolver dispatches with a populated Context
//!         -> the Response applies itself to the sink
//!         -> session saves
//!         -> envelope closes, logging status/method/duration/bytes/uri
//! ```
//!
//! A passthrough sink handler short-circuits after dispatch: it owns the
//! exchange, so response application and session save are skipped (the access
//! log still observes whatever it wrote).
//!
//! ## Quick start
//!
//! ```no_run
//! use aileron::app::{App, Registrations};
//! use aileron::config::AppConfig;
//! use aileron::dispatcher::Handler;
//! use aileron::response::ContentResponse;
//! use aileron::server::{AppService, HttpServer};
//! use std::sync::Arc;
//!
//! let mut module = Registrations::new();
//! module.route("greet", "/hi/{name}");
//! module.handle(
//!     "greet",
//!     Handler::func(|ctx| {
//!         let name = ctx.param("name").unwrap_or("world");
//!         Ok(Box::new(ContentResponse::plain(format!("hello {name}"))))
//!     }),
//! );
//!
//! let app = App::new(AppConfig::default(), module, Registrations::new())?;
//! let handle = HttpServer::new(AppService::new(Arc::new(app))).start("0.0.0.0:8080")?;
//! handle.join().ok();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Runtime considerations
//!
//! Aileron uses the `may` coroutine runtime, not tokio. Each request runs in
//! a lightweight coroutine; the stack size is configurable via
//! `AILERON_STACK_SIZE`. The dispatcher is read-only after construction and
//! is shared across request coroutines without locking.

pub mod app;
pub mod config;
pub mod context;
pub mod data;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod render;
pub mod response;
pub mod router;
pub mod server;
pub mod session;

pub use app::{App, Registrations};
pub use config::{AppConfig, RuntimeConfig};
pub use context::Context;
pub use dispatcher::{
    DataController, Dispatch, GetController, Handler, PostController, SinkController,
};
pub use error::Error;
pub use response::{ContentResponse, JsonResponse, RedirectResponse, Response, ResponseSink};
pub use session::{Session, SessionManager};
