//! Fallback data sources for the data-get path.
//!
//! The fallback is selected once at [`App`](crate::app::App) construction from
//! the debug flag; the hot path never branches on an environment check. In
//! production the fallback is [`NoFallback`] and an unknown handler name is
//! always a hard fault.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Secondary source consulted when `get_data` is asked for an unregistered
/// handler name.
pub trait DataFallback: Send + Sync {
    /// Fetch a value for `name`, or `None` to fall through to the hard fault.
    fn fetch(&self, name: &str) -> Option<Value>;
}

/// Production fallback: nothing ever matches.
pub struct NoFallback;

impl DataFallback for NoFallback {
    fn fetch(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Development fallback reading `{dir}/{name}.mock.json` fixtures.
///
/// Read or parse failures fall through to the hard fault rather than serving
/// a partial fixture.
pub struct FixtureDir {
    dir: PathBuf,
}

impl FixtureDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DataFallback for FixtureDir {
    fn fetch(&self, name: &str) -> Option<Value> {
        // Fixture names come from the URL; refuse anything path-like.
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        let path = self.dir.join(format!("{name}.mock.json"));
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(name = %name, path = %path.display(), "Serving mock fixture");
                Some(value)
            }
            Err(_) => None,
        }
    }
}
