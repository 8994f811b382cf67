//! Tests for capability-based handler dispatch.
//!
//! Covers the fixed resolution priority, the JSON wrapping of data shapes,
//! the 405 policy for method-bound capabilities, and the passthrough escape
//! hatch.

use aileron::context::Context;
use aileron::dispatcher::{
    dispatch, DataController, Dispatch, GetController, Handler, PostController, SinkController,
};
use aileron::response::{ContentResponse, Response, ResponseSink};
use aileron::session::Session;
use http::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

fn ctx(method: Method) -> Context {
    Context::new(
        method,
        "/t".to_string(),
        "t".to_string(),
        HashMap::new(),
        HashMap::new(),
        HashMap::new(),
        HashMap::new(),
        None,
        Session::new(),
    )
}

fn apply(outcome: Dispatch, sink: &mut ResponseSink) {
    match outcome {
        Dispatch::Response(r) => r.apply(sink).unwrap(),
        other => panic!("expected a response, got {other:?}"),
    }
}

struct Greeter;

impl GetController for Greeter {
    fn get(&self, _ctx: &mut Context) -> anyhow::Result<Box<dyn Response>> {
        Ok(Box::new(ContentResponse::plain("hello")))
    }
}

struct Submitter;

impl PostController for Submitter {
    fn post(&self, _ctx: &mut Context) -> anyhow::Result<Box<dyn Response>> {
        Ok(Box::new(ContentResponse::plain("submitted")))
    }
}

struct Counter;

impl DataController for Counter {
    fn data(&self, _ctx: &mut Context) -> anyhow::Result<Value> {
        Ok(json!({"count": 3}))
    }
}

struct RawWriter;

impl SinkController for RawWriter {
    fn serve(&self, _ctx: &mut Context, sink: &mut ResponseSink) -> io::Result<()> {
        sink.set_status(200);
        sink.write(b"raw bytes");
        Ok(())
    }
}

#[test]
fn test_get_capability_on_get() {
    let handler = Handler::Get(Arc::new(Greeter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap();
    apply(outcome, &mut sink);
    assert_eq!(sink.final_status(), 200);
    assert_eq!(sink.body(), b"hello");
}

#[test]
fn test_get_capability_on_post_is_method_not_allowed() {
    let handler = Handler::Get(Arc::new(Greeter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::POST), &mut sink).unwrap();
    assert!(matches!(outcome, Dispatch::MethodNotAllowed));
    // Nothing touched the sink.
    assert_eq!(sink.bytes_written(), 0);
    assert_eq!(sink.status(), None);
}

#[test]
fn test_post_capability_on_post() {
    let handler = Handler::Post(Arc::new(Submitter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::POST), &mut sink).unwrap();
    apply(outcome, &mut sink);
    assert_eq!(sink.body(), b"submitted");
}

#[test]
fn test_post_capability_on_get_is_method_not_allowed() {
    let handler = Handler::Post(Arc::new(Submitter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap();
    assert!(matches!(outcome, Dispatch::MethodNotAllowed));
}

#[test]
fn test_raw_callback_runs_for_any_method() {
    let handler = Handler::func(|_ctx| Ok(Box::new(ContentResponse::plain("any"))));
    for method in [Method::GET, Method::POST, Method::DELETE] {
        let mut sink = ResponseSink::new();
        let outcome = dispatch(&handler, &mut ctx(method), &mut sink).unwrap();
        apply(outcome, &mut sink);
        assert_eq!(sink.body(), b"any");
    }
}

#[test]
fn test_data_controller_is_json_wrapped() {
    let handler = Handler::Data(Arc::new(Counter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap();
    apply(outcome, &mut sink);
    assert_eq!(sink.final_status(), 200);
    assert_eq!(sink.get_header("Content-Type"), Some("application/json"));
    let body: Value = serde_json::from_slice(sink.body()).unwrap();
    assert_eq!(body, json!({"count": 3}));
}

#[test]
fn test_data_callback_is_json_wrapped() {
    let handler = Handler::data_func(|_ctx| Ok(json!([1, 2, 3])));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap();
    apply(outcome, &mut sink);
    let body: Value = serde_json::from_slice(sink.body()).unwrap();
    assert_eq!(body, json!([1, 2, 3]));
}

#[test]
fn test_sink_controller_is_passthrough() {
    let handler = Handler::Sink(Arc::new(RawWriter));
    let mut sink = ResponseSink::new();
    let outcome = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap();
    assert!(matches!(outcome, Dispatch::Passthrough));
    // The controller already wrote; the sink observed it.
    assert_eq!(sink.final_status(), 200);
    assert_eq!(sink.body(), b"raw bytes");
}

#[test]
fn test_handler_error_propagates() {
    let handler = Handler::func(|_ctx| Err(anyhow::anyhow!("backend down")));
    let mut sink = ResponseSink::new();
    let err = dispatch(&handler, &mut ctx(Method::GET), &mut sink).unwrap_err();
    assert!(err.to_string().contains("backend down"));
}
