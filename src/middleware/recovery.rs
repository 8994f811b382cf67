//! Recovery and access-log envelope around a single request dispatch.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::response::ResponseSink;

/// Wraps the full dispatch of one request: converts a runtime fault into a 500
/// response and emits exactly one structured log line per request.
///
/// Per request the envelope moves through
/// `START -> DISPATCHING -> {COMPLETED | RECOVERED} -> LOGGED`; every exit
/// path of the wrapped body ends in the log step. The envelope always runs;
/// the debug flag only gates whether the fault description and backtrace are
/// written into the response body. All writes go to the buffered sink, so the
/// logging step cannot hang on an already-closed socket.
pub struct AccessLog {
    app_name: String,
    debug: bool,
}

impl AccessLog {
    pub fn new(app_name: impl Into<String>, debug: bool) -> Self {
        Self {
            app_name: app_name.into(),
            debug,
        }
    }

    /// Run `body` inside the envelope. A panic or an `Err` from the body is
    /// recovered: the status is forced to 500 when none was written yet, and
    /// the serving task keeps running.
    pub fn wrap<F>(&self, method: &str, uri: &str, sink: &mut ResponseSink, body: F)
    where
        F: FnOnce(&mut ResponseSink) -> anyhow::Result<()>,
    {
        let start = Instant::now();

        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *sink)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.recover(sink, &format!("{err:#}")),
            Err(payload) => self.recover(sink, &panic_description(payload.as_ref())),
        }

        let status = sink.final_status();
        let elapsed = start.elapsed();
        let bytes = sink.bytes_written();
        let redirect = sink.redirect_target().unwrap_or("").to_string();

        // Severity is a pure function of the status hundred-bucket.
        match status / 100 {
            2 | 3 => info!(
                app = %self.app_name,
                status = status,
                method = %method,
                duration_us = elapsed.as_micros() as u64,
                bytes = bytes,
                uri = %uri,
                redirect = %redirect,
                "Request completed"
            ),
            4 => warn!(
                app = %self.app_name,
                status = status,
                method = %method,
                duration_us = elapsed.as_micros() as u64,
                bytes = bytes,
                uri = %uri,
                redirect = %redirect,
                "Request completed"
            ),
            5 => error!(
                app = %self.app_name,
                status = status,
                method = %method,
                duration_us = elapsed.as_micros() as u64,
                bytes = bytes,
                uri = %uri,
                redirect = %redirect,
                "Request completed"
            ),
            _ => info!(
                app = %self.app_name,
                status = status,
                method = %method,
                duration_us = elapsed.as_micros() as u64,
                bytes = bytes,
                uri = %uri,
                redirect = %redirect,
                "Request completed"
            ),
        }
    }

    fn recover(&self, sink: &mut ResponseSink, description: &str) {
        let backtrace = std::backtrace::Backtrace::force_capture();
        error!(
            app = %self.app_name,
            fault = %description,
            backtrace = %backtrace,
            "Recovered fault during dispatch"
        );
        // First status write wins, so this is a no-op when the handler
        // already committed one.
        sink.set_status(500);
        if self.debug {
            sink.write(description.as_bytes());
            sink.write(b"\n");
            sink.write(backtrace.to_string().as_bytes());
        }
    }
}

fn panic_description(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_is_recovered_as_500() {
        let log = AccessLog::new("test", false);
        let mut sink = ResponseSink::new();
        log.wrap("GET", "/boom", &mut sink, |_| panic!("boom"));
        assert_eq!(sink.final_status(), 500);
        // Non-debug: no fault details leak into the body.
        assert_eq!(sink.bytes_written(), 0);
    }

    #[test]
    fn test_error_is_recovered_with_debug_body() {
        let log = AccessLog::new("test", true);
        let mut sink = ResponseSink::new();
        log.wrap("GET", "/fail", &mut sink, |_| {
            Err(anyhow::anyhow!("database unreachable"))
        });
        assert_eq!(sink.final_status(), 500);
        let body = String::from_utf8_lossy(sink.body()).to_string();
        assert!(body.contains("database unreachable"));
    }

    #[test]
    fn test_committed_status_survives_recovery() {
        let log = AccessLog::new("test", false);
        let mut sink = ResponseSink::new();
        log.wrap("GET", "/late", &mut sink, |sink| {
            sink.set_status(204);
            Err(anyhow::anyhow!("too late"))
        });
        assert_eq!(sink.final_status(), 204);
    }
}
