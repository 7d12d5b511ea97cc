//! Mock rules: request patterns mapped to canned responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::{Interaction, ShapeOptions};
use crate::core::{normalize_method, Exchange, Headers, HttpRequest};
use crate::matcher::{PathPattern, RouteCandidate};
use crate::schema::{sample_value, Schema, SchemaValidator};

/// An extra condition a request must meet for a rule to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "predicate", rename_all = "snake_case")]
pub enum MatchPredicate {
    /// A query parameter has exactly this value.
    QueryEquals {
        /// Parameter name.
        name: String,
        /// Required value.
        value: String,
    },
    /// A header has exactly this value. Names compare case-insensitively.
    HeaderEquals {
        /// Header name.
        name: String,
        /// Required value.
        value: String,
    },
    /// The body equals this value.
    BodyEquals {
        /// Required body.
        body: Value,
    },
    /// The body contains this value as a subset.
    BodyContains {
        /// Required fragment.
        fragment: Value,
    },
    /// The body satisfies this schema.
    BodyMatches {
        /// Required shape.
        schema: Schema,
    },
}

impl MatchPredicate {
    /// True when the request satisfies the predicate.
    #[must_use]
    pub fn holds(&self, request: &HttpRequest) -> bool {
        match self {
            Self::QueryEquals { name, value } => request.query.get(name) == Some(value),
            Self::HeaderEquals { name, value } => request.header(name) == Some(value.as_str()),
            Self::BodyEquals { body } => request.body.as_ref() == Some(body),
            Self::BodyContains { fragment } => request.body.as_ref().is_some_and(|b| contains(b, fragment)),
            Self::BodyMatches { schema } => {
                let body = request.body.as_ref().unwrap_or(&Value::Null);
                SchemaValidator::new().is_valid(body, schema)
            }
        }
    }
}

/// Subset containment: objects recurse key by key, everything else compares by equality.
fn contains(value: &Value, fragment: &Value) -> bool {
    match (value, fragment) {
        (Value::Object(have), Value::Object(want)) => want
            .iter()
            .all(|(k, v)| have.get(k).is_some_and(|h| contains(h, v))),
        _ => value == fragment,
    }
}

/// A registered request pattern and the response it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockRule {
    /// Rule identifier, recorded in call history on a match.
    pub id: String,
    /// Upper-cased HTTP method.
    pub method: String,
    /// Path pattern.
    pub path: PathPattern,
    /// Extra conditions, all of which must hold.
    #[serde(default)]
    pub predicates: Vec<MatchPredicate>,
    /// Response status.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: Headers,
    /// Response body.
    #[serde(default)]
    pub body: Value,
}

impl MockRule {
    /// Creates a rule answering `200` with a `null` body.
    #[must_use]
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method: normalize_method(method),
            path: PathPattern::parse(path),
            predicates: Vec::new(),
            status: 200,
            headers: Headers::new(),
            body: Value::Null,
        }
    }

    /// Replaces the generated identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets status and body.
    #[must_use]
    pub fn respond(mut self, status: u16, body: Value) -> Self {
        self.status = status;
        self.body = body;
        self
    }

    /// Adds a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a match predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: MatchPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// The exchange this rule answers with.
    #[must_use]
    pub fn response(&self) -> Exchange {
        Exchange {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Builds the provider stub a consumer interaction implies.
    ///
    /// The query string of the example request becomes `QueryEquals`
    /// predicates. The example body is served when it satisfies the
    /// interaction's own response schema; otherwise, e.g. when it holds type
    /// placeholders, a sample value of that schema is served instead.
    #[must_use]
    pub fn from_interaction(interaction: &Interaction, options: ShapeOptions) -> Self {
        let request = interaction.http_request();
        let mut rule = Self::new(&request.method, &request.path);
        for (name, value) in &request.query {
            rule = rule.with_predicate(MatchPredicate::QueryEquals {
                name: name.clone(),
                value: value.clone(),
            });
        }

        let schema = interaction.response_schema(options);
        let body = match (&interaction.response.body, &schema) {
            (Some(example), Some(schema)) if SchemaValidator::new().is_valid(example, schema) => example.clone(),
            (_, Some(schema)) => sample_value(schema),
            (Some(example), None) => example.clone(),
            (None, None) => Value::Null,
        };

        rule.headers.clone_from(&interaction.response.headers);
        rule.respond(interaction.response.status, body)
    }
}

impl RouteCandidate for MockRule {
    fn method(&self) -> &str {
        &self.method
    }

    fn pattern(&self) -> &PathPattern {
        &self.path
    }

    fn accepts(&self, request: &HttpRequest) -> bool {
        self.predicates.iter().all(|p| p.holds(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{InteractionRequest, InteractionResponse};
    use crate::schema::{validate, ObjectSchema};
    use serde_json::json;

    #[test]
    fn test_predicates() {
        let request = HttpRequest::post("/api/orders?user_id=1", json!({"product": "Laptop", "meta": {"a": 1, "b": 2}}))
            .with_header("Authorization", "Bearer t");

        assert!(MatchPredicate::QueryEquals { name: "user_id".into(), value: "1".into() }.holds(&request));
        assert!(!MatchPredicate::QueryEquals { name: "user_id".into(), value: "2".into() }.holds(&request));
        assert!(MatchPredicate::HeaderEquals { name: "authorization".into(), value: "Bearer t".into() }.holds(&request));
        assert!(MatchPredicate::BodyContains { fragment: json!({"meta": {"a": 1}}) }.holds(&request));
        assert!(!MatchPredicate::BodyContains { fragment: json!({"meta": {"c": 1}}) }.holds(&request));
        assert!(!MatchPredicate::BodyEquals { body: json!({"product": "Laptop"}) }.holds(&request));

        let schema = ObjectSchema::new().required_property("product", Schema::string()).build();
        assert!(MatchPredicate::BodyMatches { schema }.holds(&request));
    }

    #[test]
    fn test_rule_accepts_only_when_all_predicates_hold() {
        let rule = MockRule::new("GET", "/api/orders").with_predicate(MatchPredicate::QueryEquals {
            name: "user_id".into(),
            value: "1".into(),
        });

        assert!(rule.accepts(&HttpRequest::get("/api/orders?user_id=1")));
        assert!(!rule.accepts(&HttpRequest::get("/api/orders")));
    }

    #[test]
    fn test_from_interaction_serves_conforming_example() {
        let interaction = Interaction::new(
            "Get user",
            InteractionRequest::new("GET", "/api/users/1"),
            InteractionResponse::new(200).with_body(json!({"id": 1, "username": "john_doe"})),
        );
        let rule = MockRule::from_interaction(&interaction, ShapeOptions::default());

        assert_eq!(rule.method, "GET");
        assert_eq!(rule.path.as_str(), "/api/users/1");
        assert_eq!(rule.body, json!({"id": 1, "username": "john_doe"}));
    }

    #[test]
    fn test_from_interaction_replaces_placeholders() {
        let interaction = Interaction::new(
            "Orders for user",
            InteractionRequest::new("GET", "/api/orders?user_id=1"),
            InteractionResponse::new(200).with_body(json!({"orders": "array", "count": "integer"})),
        );
        let options = ShapeOptions::default();
        let rule = MockRule::from_interaction(&interaction, options);

        assert_eq!(rule.predicates.len(), 1);
        let schema = interaction.response_schema(options).unwrap();
        assert!(validate(&rule.body, &schema).is_empty());
        assert_eq!(rule.body["count"], json!(1));
    }
}
