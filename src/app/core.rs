//! App core - registration merge, per-request handling, URL reversal and the
//! data-get entry point.

use http::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::AppConfig;
use crate::context::Context;
use crate::data::{DataFallback, FixtureDir, NoFallback};
use crate::dispatcher::{dispatch, Dispatch, Handler};
use crate::error::Error;
use crate::middleware::AccessLog;
use crate::response::{JsonResponse, Response, ResponseSink};
use crate::router::RouteTable;
use crate::server::ParsedRequest;
use crate::session::SessionManager;

/// Reserved route name for the generic JSON data endpoint.
pub const INTERNAL_JSON_ROUTE: &str = "_internal.json";

/// Pattern the generic JSON data endpoint is mounted at.
pub const INTERNAL_JSON_PATTERN: &str = "/_internal/json/{handler}";

/// One registration source: `{name -> pattern}` routes and
/// `{name -> handler}` handlers.
///
/// Two sources feed an [`App`]: a module-level set contributed by feature
/// modules at build time and a deployment-level set from configuration.
/// Deployment entries override module entries of the same name. Entries are
/// kept ordered by name so route binding (and with it the match precedence
/// of overlapping patterns) is the same on every construction.
#[derive(Default, Clone)]
pub struct Registrations {
    routes: BTreeMap<String, String>,
    handlers: BTreeMap<String, Handler>,
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `pattern`. A later binding of the same name within this
    /// set replaces the earlier one.
    pub fn route(&mut self, name: &str, pattern: &str) {
        self.routes.insert(name.to_string(), pattern.to_string());
    }

    /// Register a handler under `name`, replacing any earlier registration in
    /// this set.
    pub fn handle(&mut self, name: &str, handler: Handler) {
        self.handlers.insert(name.to_string(), handler);
    }

    /// Register a handler only when `name` is still free in this set. Returns
    /// whether the handler was taken. Mock and fixture providers use this to
    /// avoid shadowing real controllers.
    pub fn handle_if_not_set(&mut self, name: &str, handler: Handler) -> bool {
        if self.handlers.contains_key(name) {
            return false;
        }
        self.handlers.insert(name.to_string(), handler);
        true
    }
}

/// The dispatcher: one immutable route table, one immutable handler table, a
/// session manager and the recovery envelope, composed once at construction.
///
/// Read-only after construction; share it across request coroutines via
/// `Arc` without locking.
pub struct App {
    config: AppConfig,
    table: RouteTable,
    handlers: BTreeMap<String, Handler>,
    sessions: SessionManager,
    fallback: Box<dyn DataFallback>,
    access_log: AccessLog,
}

impl App {
    /// Build an App from the two registration sources.
    ///
    /// Routes and handlers are merged with deployment taking precedence on
    /// name collision. Every handler name with a matching route is bound into
    /// the route table in name order (and the binding logged); handler names
    /// without a route stay reachable through [`App::get_data`] only. The
    /// generic `/_internal/json/{handler}` route is always mounted last.
    /// Construction errors (malformed mount path or pattern) stop startup.
    pub fn new(
        config: AppConfig,
        module: Registrations,
        deployment: Registrations,
    ) -> Result<Self, Error> {
        let mut routes = module.routes;
        routes.extend(deployment.routes);

        let mut handlers = module.handlers;
        handlers.extend(deployment.handlers);

        let mut table = RouteTable::new(config.mount_path.clone())?;
        for (name, handler) in &handlers {
            let Some(pattern) = routes.get(name) else {
                // Soft binding: unroutable handlers stay reachable via the
                // data-get path.
                info!(name = %name, shape = handler.shape(), "Handler has no route, data-get only");
                continue;
            };
            table.register(name, pattern)?;
            info!(name = %name, pattern = %pattern, shape = handler.shape(), "Register");
        }
        table.register(INTERNAL_JSON_ROUTE, INTERNAL_JSON_PATTERN)?;

        let fallback: Box<dyn DataFallback> = if config.debug {
            Box::new(FixtureDir::new(config.mock_dir.clone()))
        } else {
            Box::new(NoFallback)
        };

        let sessions = SessionManager::new(config.session_cookie.clone());
        let access_log = AccessLog::new(config.name.clone(), config.debug);

        Ok(Self {
            config,
            table,
            handlers,
            sessions,
            fallback,
            access_log,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.sessions
    }

    /// Resolve a named route back into a concrete mount-prefixed URL path.
    ///
    /// ```ignore
    /// app.resolve_url("cms.page.view", &[("name", "Home")])?  // "/app/cms/Home"
    /// ```
    pub fn resolve_url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        self.table.resolve(name, params)
    }

    /// The sole network-facing entry point: handle one parsed request inside
    /// the recovery and access-log envelope, writing into `sink`.
    pub fn handle(&self, req: &ParsedRequest, sink: &mut ResponseSink) {
        self.access_log
            .wrap(&req.method, &req.uri, sink, |sink| {
                self.dispatch_request(req, sink)
            });
    }

    fn dispatch_request(&self, req: &ParsedRequest, sink: &mut ResponseSink) -> anyhow::Result<()> {
        let Some(matched) = self.table.match_path(&req.path) else {
            write_no_handler(sink);
            return Ok(());
        };

        let method: Method = req.method.parse()?;
        let session = self.sessions.load(&req.cookies);
        let mut ctx = Context::new(
            method,
            req.path.clone(),
            matched.name.clone(),
            matched.params,
            req.query_params.clone(),
            req.headers.clone(),
            req.cookies.clone(),
            req.body.clone(),
            session,
        );

        if matched.name == INTERNAL_JSON_ROUTE {
            let target = ctx.param("handler").unwrap_or_default().to_string();
            let value = self.get_data(&target, &mut ctx)?;
            Box::new(JsonResponse::new(value)).apply(sink)?;
            self.sessions.save(ctx.session(), sink);
            return Ok(());
        }

        let Some(handler) = self.handlers.get(&matched.name) else {
            write_no_handler(sink);
            return Ok(());
        };

        match dispatch(handler, &mut ctx, sink)? {
            Dispatch::Response(resp) => {
                resp.apply(sink)?;
                self.sessions.save(ctx.session(), sink);
            }
            // The sink controller owns the exchange; no apply, no session save.
            Dispatch::Passthrough => {}
            Dispatch::MethodNotAllowed => {
                sink.set_status(405);
                sink.header("Content-Type", "text/plain");
                sink.write(b"405 method not allowed");
                self.sessions.save(ctx.session(), sink);
            }
        }
        Ok(())
    }

    /// Synchronous data-get entry point: the result of the data handler
    /// registered under `name`, without a full HTTP round trip.
    ///
    /// Unknown names consult the fixture fallback (debug builds only) before
    /// failing with [`Error::NotAHandler`]; a name registered under a
    /// non-data shape fails with [`Error::NotADataHandler`]. Both are
    /// request-fatal, never process-fatal.
    pub fn get_data(&self, name: &str, ctx: &mut Context) -> anyhow::Result<Value> {
        match self.handlers.get(name) {
            Some(Handler::Data(c)) => c.data(ctx),
            Some(Handler::DataFunc(f)) => f(ctx),
            Some(_) => Err(Error::NotADataHandler {
                name: name.to_string(),
            }
            .into()),
            None => {
                if let Some(value) = self.fallback.fetch(name) {
                    return Ok(value);
                }
                Err(Error::NotAHandler {
                    name: name.to_string(),
                }
                .into())
            }
        }
    }
}

fn write_no_handler(sink: &mut ResponseSink) {
    sink.set_status(404);
    sink.header("Content-Type", "text/plain");
    sink.write(b"404 page not found (no handler)");
}
