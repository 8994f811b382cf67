//! Rendering collaborator interface.
//!
//! The dispatcher never renders anything itself; feature handlers call into a
//! [`Renderer`] supplied by the templating collaborator. [`render_or_debug`]
//! wraps such a call with the `debugdata` short circuit: a request carrying a
//! non-empty `debugdata` query parameter gets a JSON dump of the raw data
//! instead of the rendered template. A debugging aid, not a protocol
//! guarantee.

use serde_json::Value;

use crate::context::Context;
use crate::response::{JsonResponse, Response};

/// Template rendering capability provided by the templating collaborator.
pub trait Renderer: Send + Sync {
    /// Render `template` with `data` into a response. Faults propagate upward
    /// and are treated as ordinary handler faults.
    fn render(
        &self,
        ctx: &mut Context,
        template: &str,
        data: Value,
    ) -> anyhow::Result<Box<dyn Response>>;
}

/// Render through `renderer`, short-circuiting to a JSON dump of `data` when
/// the request asks for `debugdata`.
pub fn render_or_debug(
    renderer: &dyn Renderer,
    ctx: &mut Context,
    template: &str,
    data: Value,
) -> anyhow::Result<Box<dyn Response>> {
    if ctx.query("debugdata").is_some_and(|d| !d.is_empty()) {
        return Ok(Box::new(JsonResponse::new(data)));
    }
    renderer.render(ctx, template, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{ContentResponse, ResponseSink};
    use crate::session::Session;
    use http::Method;
    use serde_json::json;
    use std::collections::HashMap;

    struct StubRenderer;

    impl Renderer for StubRenderer {
        fn render(
            &self,
            _ctx: &mut Context,
            template: &str,
            _data: Value,
        ) -> anyhow::Result<Box<dyn Response>> {
            Ok(Box::new(ContentResponse::html(format!("tpl:{template}"))))
        }
    }

    fn ctx_with_query(query: &[(&str, &str)]) -> Context {
        let query_params: HashMap<String, String> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Context::new(
            Method::GET,
            "/page".to_string(),
            "page".to_string(),
            HashMap::new(),
            query_params,
            HashMap::new(),
            HashMap::new(),
            None,
            Session::new(),
        )
    }

    #[test]
    fn test_render_goes_through_engine() {
        let mut ctx = ctx_with_query(&[]);
        let resp = render_or_debug(&StubRenderer, &mut ctx, "home.html", json!({"x": 1})).unwrap();
        let mut sink = ResponseSink::new();
        resp.apply(&mut sink).unwrap();
        assert_eq!(sink.body(), b"tpl:home.html");
    }

    #[test]
    fn test_debugdata_short_circuits_to_json_dump() {
        let mut ctx = ctx_with_query(&[("debugdata", "1")]);
        let resp = render_or_debug(&StubRenderer, &mut ctx, "home.html", json!({"x": 1})).unwrap();
        let mut sink = ResponseSink::new();
        resp.apply(&mut sink).unwrap();
        assert_eq!(sink.get_header("Content-Type"), Some("application/json"));
        assert_eq!(sink.body(), br#"{"x":1}"#);
    }

    #[test]
    fn test_empty_debugdata_still_renders() {
        let mut ctx = ctx_with_query(&[("debugdata", "")]);
        let resp = render_or_debug(&StubRenderer, &mut ctx, "home.html", json!({"x": 1})).unwrap();
        let mut sink = ResponseSink::new();
        resp.apply(&mut sink).unwrap();
        assert_eq!(sink.body(), b"tpl:home.html");
    }
}
