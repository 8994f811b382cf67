//! Controller resolver core - capability dispatch for the request hot path.

use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::debug;

use crate::context::Context;
use crate::response::{JsonResponse, Response, ResponseSink};

/// Controller invoked for GET requests.
pub trait GetController: Send + Sync {
    fn get(&self, ctx: &mut Context) -> anyhow::Result<Box<dyn Response>>;
}

/// Controller invoked for POST requests.
pub trait PostController: Send + Sync {
    fn post(&self, ctx: &mut Context) -> anyhow::Result<Box<dyn Response>>;
}

/// Controller producing raw data (user info, basket contents, ...) instead of
/// a full response. The result is always wrapped as a JSON response and is
/// also reachable through the generic data-get path.
pub trait DataController: Send + Sync {
    fn data(&self, ctx: &mut Context) -> anyhow::Result<Value>;
}

/// Controller that takes direct, exclusive control of the output sink. It is
/// fully responsible for finishing the exchange; response application and
/// session save are skipped for it.
pub trait SinkController: Send + Sync {
    fn serve(&self, ctx: &mut Context, sink: &mut ResponseSink) -> io::Result<()>;
}

/// Generic request -> response callback.
pub type HandlerFn = dyn Fn(&mut Context) -> anyhow::Result<Box<dyn Response>> + Send + Sync;

/// Generic request -> value callback; behaves like [`DataController`].
pub type DataFn = dyn Fn(&mut Context) -> anyhow::Result<Value> + Send + Sync;

/// A registered unit of request-handling logic: a tagged union over the fixed
/// calling shapes. Keeping the shapes explicit (rather than inspecting types
/// at runtime) makes the resolution priority auditable and testable.
#[derive(Clone)]
pub enum Handler {
    /// GET-capable controller.
    Get(Arc<dyn GetController>),
    /// POST-capable controller.
    Post(Arc<dyn PostController>),
    /// Raw request -> response callback.
    Func(Arc<HandlerFn>),
    /// Data-producing controller; results are JSON-wrapped.
    Data(Arc<dyn DataController>),
    /// Raw request -> value callback; results are JSON-wrapped.
    DataFunc(Arc<DataFn>),
    /// Passthrough escape hatch wanting the sink itself.
    Sink(Arc<dyn SinkController>),
}

impl Handler {
    /// Wrap a plain closure as a raw callback handler.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<Box<dyn Response>> + Send + Sync + 'static,
    {
        Handler::Func(Arc::new(f))
    }

    /// Wrap a plain closure as a data callback handler.
    pub fn data_func<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Handler::DataFunc(Arc::new(f))
    }

    /// Shape label used in logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Handler::Get(_) => "get",
            Handler::Post(_) => "post",
            Handler::Func(_) => "func",
            Handler::Data(_) => "data",
            Handler::DataFunc(_) => "data_func",
            Handler::Sink(_) => "sink",
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handler").field(&self.shape()).finish()
    }
}

/// Outcome of resolving and invoking one handler.
pub enum Dispatch {
    /// The handler produced a response; apply it, then save the session.
    Response(Box<dyn Response>),
    /// A sink controller finished the exchange itself. No response is applied
    /// and the session is not saved.
    Passthrough,
    /// A method-bound capability exists but the incoming method does not match
    /// it. Surfaced as 405 rather than an absent-response apply.
    MethodNotAllowed,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Response(_) => f.write_str("Dispatch::Response"),
            Dispatch::Passthrough => f.write_str("Dispatch::Passthrough"),
            Dispatch::MethodNotAllowed => f.write_str("Dispatch::MethodNotAllowed"),
        }
    }
}

/// Invoke `handler` for the method carried by `ctx`, resolving capabilities in
/// fixed priority order:
///
/// 1. GET request + GET capability
/// 2. POST request + POST capability
/// 3. raw request -> response callback
/// 4. data-producing controller, JSON-wrapped
/// 5. raw request -> value callback, JSON-wrapped
/// 6. passthrough sink controller (takes the sink, skips everything after)
///
/// A method-bound capability hit with the wrong method yields
/// [`Dispatch::MethodNotAllowed`]; handler faults propagate as errors into the
/// recovery envelope.
pub fn dispatch(
    handler: &Handler,
    ctx: &mut Context,
    sink: &mut ResponseSink,
) -> anyhow::Result<Dispatch> {
    debug!(
        shape = handler.shape(),
        method = %ctx.method(),
        route = %ctx.route_name(),
        "Dispatching to handler"
    );

    let outcome = match handler {
        Handler::Get(c) if ctx.method() == http::Method::GET => Dispatch::Response(c.get(ctx)?),
        Handler::Post(c) if ctx.method() == http::Method::POST => Dispatch::Response(c.post(ctx)?),
        Handler::Get(_) | Handler::Post(_) => Dispatch::MethodNotAllowed,
        Handler::Func(f) => Dispatch::Response(f(ctx)?),
        Handler::Data(c) => Dispatch::Response(Box::new(JsonResponse::new(c.data(ctx)?))),
        Handler::DataFunc(f) => Dispatch::Response(Box::new(JsonResponse::new(f(ctx)?))),
        Handler::Sink(c) => {
            c.serve(ctx, sink)?;
            Dispatch::Passthrough
        }
    };
    Ok(outcome)
}
