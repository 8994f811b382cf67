//! Per-client session state persisted through a fixed-name cookie.
//!
//! The manager owns load and save; the [`Context`](crate::context::Context)
//! only exposes the loaded session to handler code for the request's lifetime.
//! Loading never fails: an absent or undecodable cookie yields a fresh empty
//! session. The payload is the JSON object base64url-encoded (no padding):
//! opaque to clients, not tamper-proof. Signing belongs to a backing-store
//! collaborator, not this core.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::response::ResponseSink;

/// Opaque key-value store scoped to one client. Serializes transparently as
/// the JSON object it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    values: Map<String, Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads a session before dispatch and persists it after, exactly once each,
/// regardless of outcome. A passthrough handler forfeits the save.
#[derive(Debug, Clone)]
pub struct SessionManager {
    cookie_name: String,
}

impl SessionManager {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Decode the session from the request cookies. Never fails.
    pub fn load(&self, cookies: &HashMap<String, String>) -> Session {
        let Some(raw) = cookies.get(&self.cookie_name) else {
            return Session::new();
        };
        let decoded = match URL_SAFE_NO_PAD.decode(raw.as_bytes()) {
            Ok(d) => d,
            Err(_) => {
                debug!(cookie = %self.cookie_name, "Session cookie not base64, starting fresh");
                return Session::new();
            }
        };
        match serde_json::from_slice::<Session>(&decoded) {
            Ok(session) => session,
            Err(_) => {
                debug!(cookie = %self.cookie_name, "Session payload not valid JSON, starting fresh");
                Session::new()
            }
        }
    }

    /// Write the session back as one `Set-Cookie` header on the sink.
    pub fn save(&self, session: &Session, sink: &mut ResponseSink) {
        // An object rooted in string keys always serializes.
        let payload = serde_json::to_string(session).unwrap_or_else(|_| "{}".to_string());
        let encoded = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        sink.header(
            "Set-Cookie",
            &format!("{}={}; Path=/; HttpOnly", self.cookie_name, encoded),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cookie_value(sink: &ResponseSink, name: &str) -> String {
        let header = sink.get_header("Set-Cookie").unwrap();
        let (cookie, _) = header.split_once(';').unwrap();
        let (n, v) = cookie.split_once('=').unwrap();
        assert_eq!(n, name);
        v.to_string()
    }

    #[test]
    fn test_missing_cookie_yields_fresh_session() {
        let mgr = SessionManager::new("sid");
        let session = mgr.load(&HashMap::new());
        assert!(session.is_empty());
    }

    #[test]
    fn test_garbage_cookie_yields_fresh_session() {
        let mgr = SessionManager::new("sid");
        let mut cookies = HashMap::new();
        cookies.insert("sid".to_string(), "!!not-base64!!".to_string());
        assert!(mgr.load(&cookies).is_empty());
    }

    #[test]
    fn test_session_serializes_transparently() {
        let mut session = Session::new();
        session.set("user", json!("ann"));
        let text = serde_json::to_string(&session).unwrap();
        assert_eq!(text, r#"{"user":"ann"}"#);
        let back: Session = serde_json::from_str(&text).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mgr = SessionManager::new("sid");
        let mut session = Session::new();
        session.set("user", json!("ann"));
        session.set("visits", json!(3));

        let mut sink = ResponseSink::new();
        mgr.save(&session, &mut sink);

        let mut cookies = HashMap::new();
        cookies.insert("sid".to_string(), cookie_value(&sink, "sid"));
        let reloaded = mgr.load(&cookies);
        assert_eq!(reloaded, session);
    }
}
