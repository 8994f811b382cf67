//! Route table core - name <-> path pattern mapping for the request hot path.

use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::Error;

/// Result of successfully matching a request path against the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// Symbolic name of the matched route.
    pub name: String,
    /// Path parameters extracted from the pattern placeholders, percent-decoded.
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    name: String,
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
}

/// Bidirectional mapping between symbolic route names and path patterns.
///
/// Built once before serving begins and read-only afterwards; concurrent reads
/// need no locking. Matching is first-registered-wins; reversal
/// ([`RouteTable::resolve`]) is a left inverse of matching for every pair it
/// accepts.
#[derive(Debug, Clone)]
pub struct RouteTable {
    mount_path: String,
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Create an empty table served under `mount_path`.
    ///
    /// The mount path must be empty or start with `/` and not end with `/`.
    /// A malformed mount is a construction error, never a silent default:
    /// producing a wrong link is worse than failing startup.
    pub fn new(mount_path: impl Into<String>) -> Result<Self, Error> {
        let mount_path = mount_path.into();
        let well_formed = mount_path.is_empty()
            || (mount_path.starts_with('/')
                && !mount_path.ends_with('/')
                && !mount_path.contains(char::is_whitespace));
        if !well_formed {
            return Err(Error::InvalidMountPath { path: mount_path });
        }
        Ok(Self {
            mount_path,
            entries: Vec::new(),
            by_name: HashMap::new(),
        })
    }

    /// Path prefix the whole application is served under.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    /// Register `name` at `pattern`. Placeholders use `{param}` syntax.
    /// Re-registering a name replaces the previous pattern in place.
    pub fn register(&mut self, name: &str, pattern: &str) -> Result<(), Error> {
        let full = format!("{}{}", self.mount_path, pattern);
        let (regex, param_names) =
            compile_pattern(&full).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        let entry = RouteEntry {
            name: name.to_string(),
            pattern: pattern.to_string(),
            regex,
            param_names,
        };
        match self.by_name.get(name) {
            Some(&idx) => {
                warn!(name = %name, pattern = %pattern, "Replacing existing route");
                self.entries[idx] = entry;
            }
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Whether a route is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a request path (mount-prefixed) against the table.
    ///
    /// First registered route wins. Extracted parameter values are
    /// percent-decoded; a value that fails to decode is kept raw.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        for entry in &self.entries {
            if let Some(caps) = entry.regex.captures(path) {
                let mut params = HashMap::with_capacity(entry.param_names.len());
                for (i, pname) in entry.param_names.iter().enumerate() {
                    if let Some(m) = caps.get(i + 1) {
                        let value = urlencoding::decode(m.as_str())
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| m.as_str().to_string());
                        params.insert(pname.clone(), value);
                    }
                }
                debug!(name = %entry.name, path = %path, params = ?params, "Route matched");
                return Some(RouteMatch {
                    name: entry.name.clone(),
                    params,
                });
            }
        }
        debug!(path = %path, "No route matched");
        None
    }

    /// Reverse `name` into a concrete mount-prefixed path.
    ///
    /// Every placeholder must be filled and every supplied parameter must
    /// correspond to a placeholder; values are percent-encoded. Failures are
    /// caller-visible, never defaulted.
    pub fn resolve(&self, name: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let entry = self
            .by_name
            .get(name)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| Error::RouteNotFound {
                name: name.to_string(),
            })?;

        for (supplied, _) in params {
            if !entry.param_names.iter().any(|p| p == supplied) {
                return Err(Error::UnsatisfiedParam {
                    name: name.to_string(),
                    param: (*supplied).to_string(),
                });
            }
        }

        // The root pattern has no segments to walk; its reversal is the mount
        // path itself, which is exactly what the compiled regex accepts.
        if entry.pattern == "/" {
            return Ok(if self.mount_path.is_empty() {
                "/".to_string()
            } else {
                self.mount_path.clone()
            });
        }

        let mut path = String::with_capacity(self.mount_path.len() + entry.pattern.len());
        path.push_str(&self.mount_path);
        for segment in entry.pattern.split('/').skip(1) {
            path.push('/');
            if let Some(pname) = placeholder_name(segment) {
                let value = params
                    .iter()
                    .find(|(k, _)| *k == pname)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| Error::UnsatisfiedParam {
                        name: name.to_string(),
                        param: pname.to_string(),
                    })?;
                path.push_str(&urlencoding::encode(value));
            } else {
                path.push_str(segment);
            }
        }
        Ok(path)
    }

    /// Log every registered route. Useful at startup for verifying bindings.
    pub fn dump_routes(&self) {
        info!(
            mount_path = %self.mount_path,
            count = self.entries.len(),
            "Route table built"
        );
        for entry in &self.entries {
            info!(name = %entry.name, pattern = %entry.pattern, "Route");
        }
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|s| !s.is_empty())
}

/// Convert a path pattern to an anchored regex and its ordered parameter names.
///
/// `/hi/{name}` becomes `^/hi/([^/]+)$` with params `["name"]`. Literal
/// segments are regex-escaped.
fn compile_pattern(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
    if path.is_empty() || path == "/" {
        return Ok((Regex::new(r"^/$")?, Vec::new()));
    }

    let mut pattern = String::with_capacity(path.len() + 5);
    pattern.push('^');
    let mut param_names = Vec::with_capacity(path.matches('{').count());

    for segment in path.split('/') {
        if let Some(pname) = placeholder_name(segment) {
            pattern.push_str("/([^/]+)");
            param_names.push(pname.to_string());
        } else if !segment.is_empty() {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }

    pattern.push('$');
    Ok((Regex::new(&pattern)?, param_names))
}
