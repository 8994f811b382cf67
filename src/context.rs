//! Per-request value carrier handed to handlers.
//!
//! Created once per inbound request, never shared or reused across requests,
//! never persisted. Exposes parameter lookup, the loaded session, and a
//! profiling scope that logs elapsed time when dropped.

use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::session::Session;

/// Request context owned by exactly one dispatch.
#[derive(Debug)]
pub struct Context {
    method: Method,
    path: String,
    route_name: String,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    body: Option<Value>,
    session: Session,
}

impl Context {
    /// Build a context for one request. The server layer does this; building
    /// one by hand is only useful when driving handlers directly.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        method: Method,
        path: String,
        route_name: String,
        path_params: HashMap<String, String>,
        query_params: HashMap<String, String>,
        headers: HashMap<String, String>,
        cookies: HashMap<String, String>,
        body: Option<Value>,
        session: Session,
    ) -> Self {
        Self {
            method,
            path,
            route_name,
            path_params,
            query_params,
            headers,
            cookies,
            body,
            session,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path as matched (mount-prefixed).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the route that matched this request.
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// Path parameter extracted from the matched pattern.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Query string parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Header by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Parsed JSON request body, when one was sent.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Open a profiling scope. The elapsed time is logged when the guard drops.
    ///
    /// ```ignore
    /// let _scope = ctx.profile("db.load_user");
    /// ```
    pub fn profile(&self, label: &str) -> ProfileGuard {
        ProfileGuard {
            label: label.to_string(),
            route_name: self.route_name.clone(),
            start: Instant::now(),
        }
    }
}

/// Scope handle returned by [`Context::profile`].
#[derive(Debug)]
pub struct ProfileGuard {
    label: String,
    route_name: String,
    start: Instant,
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        debug!(
            label = %self.label,
            route = %self.route_name,
            elapsed_us = self.start.elapsed().as_micros() as u64,
            "Profile scope closed"
        );
    }
}
