//! Request matching against contracts and mock rules.
//!
//! A candidate matches when its method equals the request method
//! (case-insensitively), its path pattern matches segment for segment, and
//! any extra predicates it declares hold. Among matching candidates the one
//! with the most literal segments wins; ties go to the earliest registered.

mod pattern;

pub use pattern::{PathPattern, PatternSegment};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::HttpRequest;

/// Something a request can be routed to.
pub trait RouteCandidate {
    /// The declared HTTP method.
    fn method(&self) -> &str;

    /// The declared path pattern.
    fn pattern(&self) -> &PathPattern;

    /// Additional predicates beyond method and path. Defaults to accepting.
    fn accepts(&self, _request: &HttpRequest) -> bool {
        true
    }
}

impl<T: RouteCandidate + ?Sized> RouteCandidate for Arc<T> {
    fn method(&self) -> &str {
        (**self).method()
    }

    fn pattern(&self) -> &PathPattern {
        (**self).pattern()
    }

    fn accepts(&self, request: &HttpRequest) -> bool {
        (**self).accepts(request)
    }
}

/// A successful match.
#[derive(Debug)]
pub struct RouteMatch<'a, C> {
    /// The winning candidate.
    pub candidate: &'a C,
    /// Its position in the candidate list.
    pub index: usize,
    /// Captured path parameters.
    pub params: BTreeMap<String, String>,
    /// Specificity of the winning pattern.
    pub specificity: usize,
}

/// Outcome of matching a request.
#[derive(Debug)]
pub enum MatchOutcome<'a, C> {
    /// A candidate matched.
    Matched(RouteMatch<'a, C>),
    /// Nothing matched.
    NoMatch,
}

impl<'a, C> MatchOutcome<'a, C> {
    /// True when a candidate matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Converts into an option.
    #[must_use]
    pub fn into_option(self) -> Option<RouteMatch<'a, C>> {
        match self {
            Self::Matched(m) => Some(m),
            Self::NoMatch => None,
        }
    }

    /// The winning candidate, if any.
    #[must_use]
    pub fn candidate(&self) -> Option<&'a C> {
        match self {
            Self::Matched(m) => Some(m.candidate),
            Self::NoMatch => None,
        }
    }
}

/// Stateless request matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMatcher;

impl RequestMatcher {
    /// Creates a matcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Finds the best candidate for a request.
    #[must_use]
    pub fn find<'a, C: RouteCandidate>(&self, request: &HttpRequest, candidates: &'a [C]) -> MatchOutcome<'a, C> {
        let mut best: Option<RouteMatch<'a, C>> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            if !candidate.method().eq_ignore_ascii_case(&request.method) {
                continue;
            }
            let Some(params) = candidate.pattern().captures(&request.path) else {
                continue;
            };
            if !candidate.accepts(request) {
                continue;
            }

            let specificity = candidate.pattern().specificity();
            // Strictly greater keeps the earliest candidate on ties.
            if best.as_ref().map_or(true, |b| specificity > b.specificity) {
                best = Some(RouteMatch {
                    candidate,
                    index,
                    params,
                    specificity,
                });
            }
        }

        best.map_or(MatchOutcome::NoMatch, MatchOutcome::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Route {
        name: &'static str,
        method: &'static str,
        pattern: PathPattern,
        query: Option<(&'static str, &'static str)>,
    }

    impl Route {
        fn new(name: &'static str, method: &'static str, path: &str) -> Self {
            Self {
                name,
                method,
                pattern: PathPattern::parse(path),
                query: None,
            }
        }
    }

    impl RouteCandidate for Route {
        fn method(&self) -> &str {
            self.method
        }

        fn pattern(&self) -> &PathPattern {
            &self.pattern
        }

        fn accepts(&self, request: &HttpRequest) -> bool {
            self.query
                .map_or(true, |(k, v)| request.query.get(k).is_some_and(|actual| actual == v))
        }
    }

    #[test]
    fn test_literal_beats_parameter() {
        let routes = vec![
            Route::new("param", "GET", "/users/{id}"),
            Route::new("literal", "GET", "/users/status"),
        ];

        let outcome = RequestMatcher::new().find(&HttpRequest::get("/users/status"), &routes);
        assert_eq!(outcome.candidate().unwrap().name, "literal");

        let outcome = RequestMatcher::new().find(&HttpRequest::get("/users/42"), &routes);
        let matched = outcome.into_option().unwrap();
        assert_eq!(matched.candidate.name, "param");
        assert_eq!(matched.params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let routes = vec![
            Route::new("first", "GET", "/users/{id}"),
            Route::new("second", "GET", "/users/{user_id}"),
        ];

        let outcome = RequestMatcher::new().find(&HttpRequest::get("/users/1"), &routes);
        assert_eq!(outcome.into_option().unwrap().index, 0);
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let routes = vec![Route::new("create", "post", "/users")];
        assert!(RequestMatcher::new().find(&HttpRequest::new("POST", "/users"), &routes).is_match());
        assert!(!RequestMatcher::new().find(&HttpRequest::get("/users"), &routes).is_match());
    }

    #[test]
    fn test_predicates_filter_candidates() {
        let mut filtered = Route::new("filtered", "GET", "/api/orders");
        filtered.query = Some(("user_id", "1"));
        let routes = vec![filtered, Route::new("fallback", "GET", "/api/{resource}")];

        let outcome = RequestMatcher::new().find(&HttpRequest::get("/api/orders?user_id=1"), &routes);
        assert_eq!(outcome.candidate().unwrap().name, "filtered");

        let outcome = RequestMatcher::new().find(&HttpRequest::get("/api/orders?user_id=2"), &routes);
        assert_eq!(outcome.candidate().unwrap().name, "fallback");
    }

    #[test]
    fn test_no_match() {
        let routes: Vec<Route> = vec![];
        assert!(!RequestMatcher::new().find(&HttpRequest::get("/"), &routes).is_match());
    }
}
