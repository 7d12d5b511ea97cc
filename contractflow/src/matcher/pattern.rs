//! Path patterns with single-segment parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Matches any single segment and captures it.
    Param(String),
}

/// A parsed path pattern such as `/users/{id}`.
///
/// Empty segments are dropped, so `api/users/` and `/api/users` are the same
/// pattern. Parameters are written `{name}` or `:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathPattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parses a pattern.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let path = raw.split_once('?').map_or(raw, |(path, _)| path);
        let segments = split_segments(path)
            .map(|segment| {
                if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    PatternSegment::Param(name.to_string())
                } else if let Some(name) = segment.strip_prefix(':').filter(|n| !n.is_empty()) {
                    PatternSegment::Param(name.to_string())
                } else {
                    PatternSegment::Literal(segment.to_string())
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Number of literal segments; higher is more specific.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PatternSegment::Literal(_)))
            .count()
    }

    /// True when the pattern has no parameters.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.specificity() == self.segments.len()
    }

    /// Parameter names in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                PatternSegment::Param(name) => Some(name.as_str()),
                PatternSegment::Literal(_) => None,
            })
            .collect()
    }

    /// Matches a concrete path, returning captured parameters.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        let actual: Vec<&str> = split_segments(path).collect();
        if actual.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in self.segments.iter().zip(actual) {
            match expected {
                PatternSegment::Literal(lit) if lit == actual => {}
                PatternSegment::Literal(_) => return None,
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), actual.to_string());
                }
            }
        }
        Some(params)
    }

    /// True when the pattern matches the path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Renders a concrete path, substituting parameters from `params` or `fallback`.
    #[must_use]
    pub fn render(&self, params: &BTreeMap<String, String>, fallback: &str) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|s| match s {
                PatternSegment::Literal(lit) => lit.as_str(),
                PatternSegment::Param(name) => params.get(name).map_or(fallback, String::as_str),
            })
            .collect();
        format!("/{}", parts.join("/"))
    }
}

impl From<String> for PathPattern {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for PathPattern {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<PathPattern> for String {
    fn from(pattern: PathPattern) -> Self {
        pattern.raw
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
