//! Consumer-driven contracts.
//!
//! A consumer lists the interactions it relies on. Each interaction gives an
//! example request and the response shape it expects back, usually as an
//! example body rather than a formal schema.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::definition::Contract;
use crate::config::VerifierConfig;
use crate::core::{Headers, HttpRequest};
use crate::errors::Result;
use crate::schema::{infer_schema_with, InferenceOptions, Schema};

/// The request half of an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// HTTP method.
    pub method: String,
    /// Request target, optionally with a query string.
    pub path: String,
    /// Request headers.
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl InteractionRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The response half of an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// Expected status.
    pub status: u16,
    /// Expected headers.
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Example body; its shape is inferred when no schema is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Explicit schema, taking precedence over the example body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl InteractionResponse {
    /// Creates a response expectation with only a status.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
            schema: None,
        }
    }

    /// Sets the example body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets an explicit schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Adds an expected header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// How example bodies turn into response schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Every field present in the example is required.
    pub require_example_fields: bool,
    /// Example strings naming a type stand for that type.
    pub type_placeholders: bool,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self::from(&VerifierConfig::default())
    }
}

impl From<&VerifierConfig> for ShapeOptions {
    fn from(config: &VerifierConfig) -> Self {
        Self {
            require_example_fields: config.require_example_fields,
            type_placeholders: config.type_placeholders,
        }
    }
}

/// One expected request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Description, unique within its consumer contract.
    pub description: String,
    /// Example request.
    pub request: InteractionRequest,
    /// Expected response.
    pub response: InteractionResponse,
}

impl Interaction {
    /// Creates an interaction.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        request: InteractionRequest,
        response: InteractionResponse,
    ) -> Self {
        Self {
            description: description.into(),
            request,
            response,
        }
    }

    /// The request to send to the provider.
    #[must_use]
    pub fn http_request(&self) -> HttpRequest {
        let mut request = HttpRequest::new(&self.request.method, &self.request.path);
        request.headers.clone_from(&self.request.headers);
        request.body.clone_from(&self.request.body);
        request
    }

    /// The response schema, explicit or inferred from the example body.
    #[must_use]
    pub fn response_schema(&self, options: ShapeOptions) -> Option<Schema> {
        if let Some(schema) = &self.response.schema {
            return Some(schema.clone());
        }
        let example = self.response.body.as_ref()?;
        let inference = InferenceOptions {
            type_placeholders: options.type_placeholders,
        };
        let schema = infer_schema_with(example, inference);
        Some(if options.require_example_fields {
            schema.require_all_properties()
        } else {
            schema
        })
    }

    /// Builds the ad-hoc contract this interaction implies.
    pub fn to_contract(&self, consumer: &str, options: ShapeOptions) -> Result<Contract> {
        let mut builder = Contract::builder(
            format!("{consumer}: {}", self.description),
            &self.request.method,
            &self.request.path,
        )
        .status(self.response.status)
        .example_path(self.request.path.clone());

        if let Some(schema) = self.response_schema(options) {
            builder = builder.response_schema(schema);
        }
        for (name, value) in &self.response.headers {
            builder = builder.header(name, value);
        }
        builder.build()
    }

    /// Stable SHA-256 digest of the interaction definition.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}

/// What a consumer expects from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerContract {
    /// Consumer name, e.g. `MobileApp`.
    #[serde(rename = "consumer")]
    pub consumer_name: String,
    /// Provider name, e.g. `UserAPI`.
    #[serde(rename = "provider")]
    pub provider_name: String,
    /// Interactions in declared order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl ConsumerContract {
    /// Creates a contract with no interactions.
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer_name: consumer.into(),
            provider_name: provider.into(),
            interactions: Vec::new(),
        }
    }

    /// Appends an interaction.
    pub fn add_interaction(&mut self, interaction: Interaction) {
        tracing::debug!(
            consumer = %self.consumer_name,
            interaction = %interaction.description,
            "Interaction added"
        );
        self.interactions.push(interaction);
    }

    /// Appends an interaction, builder style.
    #[must_use]
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.add_interaction(interaction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use serde_json::json;

    fn get_user() -> Interaction {
        Interaction::new(
            "Get user by ID",
            InteractionRequest::new("GET", "/api/users/1"),
            InteractionResponse::new(200).with_body(json!({"id": 1, "username": "string", "email": "string"})),
        )
    }

    #[test]
    fn test_inferred_schema_requires_example_fields() {
        let schema = get_user().response_schema(ShapeOptions::default()).unwrap();

        assert!(validate(&json!({"id": 5, "username": "jane", "email": "j@x.io"}), &schema).is_empty());
        let errors = validate(&json!({"id": 5, "username": "jane"}), &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].path.ends_with_key("email"));
    }

    #[test]
    fn test_type_only_inference_when_disabled() {
        let options = ShapeOptions {
            require_example_fields: false,
            type_placeholders: false,
        };
        let schema = get_user().response_schema(options).unwrap();
        assert!(validate(&json!({"id": 5}), &schema).is_empty());
    }

    #[test]
    fn test_explicit_schema_wins() {
        let interaction = Interaction::new(
            "Health",
            InteractionRequest::new("GET", "/health"),
            InteractionResponse::new(200)
                .with_body(json!({"status": "ok"}))
                .with_schema(Schema::any()),
        );
        assert_eq!(interaction.response_schema(ShapeOptions::default()), Some(Schema::Any));
    }

    #[test]
    fn test_to_contract() {
        let contract = get_user().to_contract("MobileApp", ShapeOptions::default()).unwrap();

        assert_eq!(contract.name, "MobileApp: Get user by ID");
        assert_eq!(contract.method, "GET");
        assert_eq!(contract.expected_status, 200);
        assert!(contract.response_schema.is_some());
    }

    #[test]
    fn test_http_request_keeps_query_and_body() {
        let interaction = Interaction::new(
            "Orders",
            InteractionRequest::new("get", "/api/orders?user_id=1").with_body(json!({"x": 1})),
            InteractionResponse::new(200),
        );
        let request = interaction.http_request();
        assert_eq!(request.method, "GET");
        assert_eq!(request.query.get("user_id"), Some(&"1".to_string()));
        assert_eq!(request.body, Some(json!({"x": 1})));
    }

    #[test]
    fn test_fingerprint_tracks_definition() {
        let a = get_user();
        let mut b = get_user();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.response.status = 201;
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_serialized_field_names() {
        let contract = ConsumerContract::new("MobileApp", "UserAPI").with_interaction(get_user());
        let doc = serde_json::to_value(&contract).unwrap();

        assert_eq!(doc["consumer"], "MobileApp");
        assert_eq!(doc["provider"], "UserAPI");
        assert_eq!(doc["interactions"][0]["request"]["path"], "/api/users/1");
    }
}
