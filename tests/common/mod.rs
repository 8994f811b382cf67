//! Shared helpers for driving the App without a socket.
#![allow(dead_code)] // not every test binary uses every helper

use aileron::server::{parse_query_params, ParsedRequest};
use serde_json::Value;
use std::collections::HashMap;

/// Build a request from a method and a path (query string allowed).
pub fn request(method: &str, uri: &str, body: Option<Value>) -> ParsedRequest {
    let path = uri.split('?').next().unwrap_or("/").to_string();
    ParsedRequest {
        method: method.to_string(),
        uri: uri.to_string(),
        path,
        headers: HashMap::new(),
        cookies: HashMap::new(),
        query_params: parse_query_params(uri),
        body,
    }
}

pub fn get(uri: &str) -> ParsedRequest {
    request("GET", uri, None)
}

pub fn post(uri: &str, body: Option<Value>) -> ParsedRequest {
    request("POST", uri, body)
}

pub fn with_cookie(mut req: ParsedRequest, name: &str, value: &str) -> ParsedRequest {
    req.cookies.insert(name.to_string(), value.to_string());
    req
}

/// Pull the session cookie value out of a finished sink's Set-Cookie header.
pub fn session_cookie(sink: &aileron::ResponseSink, name: &str) -> Option<String> {
    let header = sink.get_header("Set-Cookie")?;
    let (cookie, _) = header.split_once(';')?;
    let (n, v) = cookie.split_once('=')?;
    (n == name).then(|| v.to_string())
}
