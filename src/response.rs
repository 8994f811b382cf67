//! Response abstraction and the buffered output sink.
//!
//! Every handler result is something that can apply itself to the output sink
//! (status, headers, body). Raw values coming out of data handlers are never
//! applied directly; they are wrapped in [`JsonResponse`] first. The sink
//! buffers the whole response and tracks status and byte count for the access
//! log; the server layer flushes it to the network exactly once per request.

use serde_json::Value;
use std::io;

/// Buffered output sink decorating the network response.
///
/// Write-through is pass-except-for-counting: nothing is altered, but the
/// final status and the number of body bytes are observable for logging.
/// Lifetime is one request.
#[derive(Debug, Default)]
pub struct ResponseSink {
    status: Option<u16>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the response status. The first write wins; a recovered fault
    /// only forces 500 when no status was set before the fault.
    pub fn set_status(&mut self, status: u16) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    /// Status as written, or `None` if no handler committed one yet.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Final status for logging and flushing: an untouched sink is a 200.
    pub fn final_status(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// Append a response header. Repeated names are kept in order
    /// (Set-Cookie needs that).
    pub fn header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Look up the last header written under `name` (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Redirect target, when the response set one.
    pub fn redirect_target(&self) -> Option<&str> {
        self.get_header("Location")
    }

    /// Append body bytes, counting them.
    pub fn write(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }

    /// Number of body bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.body.len()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the sink into `(status, headers, body)` for the network flush.
    pub fn into_parts(self) -> (u16, Vec<(String, String)>, Vec<u8>) {
        let status = self.status.unwrap_or(200);
        (status, self.headers, self.body)
    }
}

/// Capability contract all handler results must satisfy: apply yourself to the
/// output sink. Exactly one response is applied per request, exactly once.
pub trait Response: Send {
    fn apply(self: Box<Self>, sink: &mut ResponseSink) -> io::Result<()>;
}

/// Plain content response with an explicit content type.
pub struct ContentResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl ContentResponse {
    /// A 200 `text/html` response, the common case for rendered pages.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    /// A 200 `text/plain` response.
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/plain".to_string(),
            body: body.into(),
        }
    }
}

impl Response for ContentResponse {
    fn apply(self: Box<Self>, sink: &mut ResponseSink) -> io::Result<()> {
        sink.set_status(self.status);
        sink.header("Content-Type", &self.content_type);
        sink.write(self.body.as_bytes());
        Ok(())
    }
}

/// JSON-wrapping adapter: carries any value and applies it as an
/// `application/json` body.
pub struct JsonResponse {
    pub data: Value,
}

impl JsonResponse {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

impl Response for JsonResponse {
    fn apply(self: Box<Self>, sink: &mut ResponseSink) -> io::Result<()> {
        let bytes = serde_json::to_vec(&self.data).map_err(io::Error::other)?;
        sink.set_status(200);
        sink.header("Content-Type", "application/json");
        sink.write(&bytes);
        Ok(())
    }
}

/// Redirect to another location. Shows up in the access log as `-> {target}`.
pub struct RedirectResponse {
    pub status: u16,
    pub location: String,
}

impl RedirectResponse {
    /// A 303 See Other, the right redirect after a POST.
    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            status: 303,
            location: location.into(),
        }
    }

    /// A 302 Found.
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            location: location.into(),
        }
    }
}

impl Response for RedirectResponse {
    fn apply(self: Box<Self>, sink: &mut ResponseSink) -> io::Result<()> {
        sink.set_status(self.status);
        sink.header("Location", &self.location);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sink_counts_bytes_and_keeps_first_status() {
        let mut sink = ResponseSink::new();
        sink.set_status(404);
        sink.set_status(200);
        sink.write(b"hello");
        sink.write(b" world");
        assert_eq!(sink.status(), Some(404));
        assert_eq!(sink.bytes_written(), 11);
    }

    #[test]
    fn test_json_response_apply() {
        let mut sink = ResponseSink::new();
        Box::new(JsonResponse::new(json!({"x": 1})))
            .apply(&mut sink)
            .unwrap();
        assert_eq!(sink.final_status(), 200);
        assert_eq!(sink.get_header("Content-Type"), Some("application/json"));
        assert_eq!(sink.body(), br#"{"x":1}"#);
    }

    #[test]
    fn test_redirect_sets_location() {
        let mut sink = ResponseSink::new();
        Box::new(RedirectResponse::see_other("/next"))
            .apply(&mut sink)
            .unwrap();
        assert_eq!(sink.final_status(), 303);
        assert_eq!(sink.redirect_target(), Some("/next"));
    }
}
