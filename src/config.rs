//! Application and runtime configuration.
//!
//! `AppConfig` is read once at construction; nothing in the request hot path
//! consults the environment. The debug flag gates the fixture fallback and the
//! verbosity of recovered faults, never the recovery itself.

use std::env;
use std::path::PathBuf;

/// Default cookie name carrying the encoded session payload.
pub const DEFAULT_SESSION_COOKIE: &str = "sid";

/// Default directory consulted for `{name}.mock.json` fixtures in debug mode.
pub const DEFAULT_MOCK_DIR: &str = "frontend/src/mocks";

/// Static configuration for an [`App`](crate::app::App) instance.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application name, used as a field on every access-log line.
    pub name: String,
    /// Fixed path prefix the whole application is served under. Empty for
    /// root. Must start with `/` and not end with `/` otherwise; validated at
    /// construction.
    pub mount_path: String,
    /// Enables the fixture fallback and fault details in 500 bodies.
    pub debug: bool,
    /// Name of the session cookie.
    pub session_cookie: String,
    /// Directory holding `{handler}.mock.json` fixtures (debug only).
    pub mock_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "aileron".to_string(),
            mount_path: String::new(),
            debug: false,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            mock_dir: PathBuf::from(DEFAULT_MOCK_DIR),
        }
    }
}

impl AppConfig {
    /// Load configuration from `AILERON_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(name) = env::var("AILERON_NAME") {
            cfg.name = name;
        }
        if let Ok(mount) = env::var("AILERON_MOUNT_PATH") {
            cfg.mount_path = mount;
        }
        if let Ok(debug) = env::var("AILERON_DEBUG") {
            cfg.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }
        if let Ok(cookie) = env::var("AILERON_SESSION_COOKIE") {
            cfg.session_cookie = cookie;
        }
        if let Ok(dir) = env::var("AILERON_MOCK_DIR") {
            cfg.mock_dir = PathBuf::from(dir);
        }
        cfg
    }
}

/// Coroutine runtime configuration.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for request coroutines in bytes (default: 16 KB / 0x4000).
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from `AILERON_STACK_SIZE` (decimal or `0x` hex).
    pub fn from_env() -> Self {
        let stack_size = match env::var("AILERON_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(0x4000)
                } else {
                    val.parse().unwrap_or(0x4000)
                }
            }
            Err(_) => 0x4000,
        };
        RuntimeConfig { stack_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.session_cookie, "sid");
        assert!(!cfg.debug);
        assert!(cfg.mount_path.is_empty());
    }
}
