use super::request::parse_request;
use crate::app::App;
use crate::response::ResponseSink;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        302 => "Found",
        303 => "See Other",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Flush a finished sink into the network response, exactly once per request.
pub fn flush_sink(sink: ResponseSink, res: &mut Response) {
    let (status, headers, body) = sink.into_parts();
    res.status_code(status as usize, status_reason(status));
    for (name, value) in headers {
        // may_minihttp wants 'static header lines; one leak per header write.
        let line = format!("{name}: {value}").into_boxed_str();
        res.header(Box::leak(line));
    }
    res.body_vec(body);
}

/// `may_minihttp` service delegating every request to the [`App`].
///
/// The App is read-only after construction, so clones of this service share
/// it through an `Arc` with no locking.
#[derive(Clone)]
pub struct AppService {
    pub app: Arc<App>,
}

impl AppService {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let mut sink = ResponseSink::new();
        self.app.handle(&parsed, &mut sink);
        flush_sink(sink, res);
        Ok(())
    }
}
