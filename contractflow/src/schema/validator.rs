//! Recursive, path-tracked schema validation.
//!
//! Validation walks the value depth-first and collects every violation in
//! root-to-leaf, left-to-right order. It never stops at the first problem,
//! with two exceptions: a type mismatch stops descent into that subtree, and
//! a missing required field has nothing beneath it to check.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::format;
use super::types::{NumericSchema, ObjectSchema, Schema, SchemaType, StringSchema};
use crate::config::ValidationConfig;

/// One step in a path from the document root to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

/// An ordered sequence of field-access steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(pub Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the steps.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the final step.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// True when the path ends in the given key.
    #[must_use]
    pub fn ends_with_key(&self, key: &str) -> bool {
        matches!(self.last(), Some(PathSegment::Key(k)) if k == key)
    }

    /// Returns a copy with an extra key step.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Key(key.into()));
        next
    }

    /// Returns a copy with an extra index step.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Index(index));
        next
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Category of a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value has the wrong type.
    TypeMismatch,
    /// A required field is absent.
    MissingField,
    /// The value is not one of the enumerated values.
    EnumViolation,
    /// A string does not match its declared format.
    FormatViolation,
    /// A string is shorter or longer than allowed.
    LengthViolation,
    /// A number is outside its bounds.
    RangeViolation,
    /// A field is not declared by the schema (strict mode only).
    UnknownField,
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Where the violation occurred.
    pub path: FieldPath,
    /// What kind of violation it is.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
    /// The type the schema expected, when relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<String>,
    /// The type actually found, when relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_type: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            expected_type: None,
            actual_type: None,
        }
    }

    /// Sets the expected and actual types.
    #[must_use]
    pub fn with_types(mut self, expected: Option<String>, actual: Option<String>) -> Self {
        self.expected_type = expected;
        self.actual_type = actual;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Schema validator with configurable strictness.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    /// Creates a permissive validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator from configuration.
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Creates a validator that flags undeclared object fields.
    #[must_use]
    pub fn strict() -> Self {
        Self::with_config(ValidationConfig {
            strict: true,
            ..ValidationConfig::default()
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a value, returning every violation found.
    #[must_use]
    pub fn validate(&self, value: &serde_json::Value, schema: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.walk(value, schema, &FieldPath::root(), &mut errors);
        errors
    }

    /// True when the value satisfies the schema.
    #[must_use]
    pub fn is_valid(&self, value: &serde_json::Value, schema: &Schema) -> bool {
        self.validate(value, schema).is_empty()
    }

    fn walk(
        &self,
        value: &serde_json::Value,
        schema: &Schema,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(expected) = schema.schema_type() {
            if !expected.accepts(value) {
                let actual = SchemaType::of_value(value);
                errors.push(
                    ValidationError::new(
                        path.clone(),
                        ViolationKind::TypeMismatch,
                        format!("expected {expected}, found {actual}"),
                    )
                    .with_types(Some(expected.to_string()), Some(actual.to_string())),
                );
                return;
            }
        }

        match schema {
            Schema::Object(obj) => self.walk_object(value, obj, path, errors),
            Schema::Array(arr) => {
                if let (Some(items), Some(elements)) = (&arr.items, value.as_array()) {
                    for (i, element) in elements.iter().enumerate() {
                        self.walk(element, items, &path.index(i), errors);
                    }
                }
            }
            Schema::String(s) => self.check_string(value, s, path, errors),
            Schema::Integer(n) | Schema::Number(n) => check_bounds(value, n, path, errors),
            Schema::Enum(e) => {
                if let Some(base) = &e.base {
                    self.walk(value, base, path, errors);
                }
                if !e.values.contains(value) {
                    errors.push(
                        ValidationError::new(
                            path.clone(),
                            ViolationKind::EnumViolation,
                            format!(
                                "value {} is not one of {}",
                                value,
                                serde_json::Value::Array(e.values.clone())
                            ),
                        )
                        .with_types(
                            schema.schema_type().map(|t| t.to_string()),
                            Some(SchemaType::of_value(value).to_string()),
                        ),
                    );
                }
            }
            Schema::Boolean | Schema::Null | Schema::Any => {}
        }
    }

    fn walk_object(
        &self,
        value: &serde_json::Value,
        obj: &ObjectSchema,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(fields) = value.as_object() else {
            return;
        };

        for name in &obj.required {
            if !fields.contains_key(name) {
                let expected = obj.properties.get(name).and_then(Schema::schema_type);
                errors.push(
                    ValidationError::new(
                        path.key(name.as_str()),
                        ViolationKind::MissingField,
                        format!("missing required field '{name}'"),
                    )
                    .with_types(expected.map(|t| t.to_string()), None),
                );
            }
        }

        for (name, prop) in &obj.properties {
            if let Some(field) = fields.get(name) {
                self.walk(field, prop, &path.key(name.as_str()), errors);
            }
        }

        if self.config.strict {
            for name in fields.keys().filter(|k| !obj.properties.contains_key(*k)) {
                errors.push(ValidationError::new(
                    path.key(name.as_str()),
                    ViolationKind::UnknownField,
                    format!("field '{name}' is not declared by the schema"),
                ));
            }
        }
    }

    fn check_string(
        &self,
        value: &serde_json::Value,
        s: &StringSchema,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(text) = value.as_str() else {
            return;
        };
        let len = text.chars().count();

        if let Some(min) = s.min_length.filter(|min| len < *min) {
            errors.push(ValidationError::new(
                path.clone(),
                ViolationKind::LengthViolation,
                format!("length {len} is shorter than minimum {min}"),
            ));
        }
        if let Some(max) = s.max_length.filter(|max| len > *max) {
            errors.push(ValidationError::new(
                path.clone(),
                ViolationKind::LengthViolation,
                format!("length {len} is longer than maximum {max}"),
            ));
        }
        if self.config.check_formats {
            if let Some(fmt) = s.format.as_ref().filter(|f| !format::conforms(f, text)) {
                errors.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::FormatViolation,
                    format!("'{text}' is not a valid {}", fmt.as_str()),
                ));
            }
        }
    }
}

fn check_bounds(
    value: &serde_json::Value,
    n: &NumericSchema,
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    let Some(number) = value.as_f64() else {
        return;
    };
    if let Some(min) = n.minimum.filter(|min| number < *min) {
        errors.push(ValidationError::new(
            path.clone(),
            ViolationKind::RangeViolation,
            format!("{value} is below minimum {min}"),
        ));
    }
    if let Some(max) = n.maximum.filter(|max| number > *max) {
        errors.push(ValidationError::new(
            path.clone(),
            ViolationKind::RangeViolation,
            format!("{value} is above maximum {max}"),
        ));
    }
}

/// Validates with the default permissive validator.
#[must_use]
pub fn validate(value: &serde_json::Value, schema: &Schema) -> Vec<ValidationError> {
    SchemaValidator::new().validate(value, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, StringSchema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user_schema() -> Schema {
        ObjectSchema::new()
            .required_property("id", Schema::integer())
            .required_property("username", Schema::string())
            .required_property("email", Schema::email())
            .property("age", Schema::integer_between(Some(0.0), None))
            .build()
    }

    #[test]
    fn test_valid_value_has_no_errors() {
        let value = json!({"id": 1, "username": "a", "email": "a@b.c"});
        assert!(validate(&value, &user_schema()).is_empty());
    }

    #[test]
    fn test_extra_fields_ignored_by_default() {
        let value = json!({"id": 1, "username": "a", "email": "a@b.c", "city": "New York"});
        assert!(validate(&value, &user_schema()).is_empty());
    }

    #[test]
    fn test_strict_mode_flags_extra_fields() {
        let value = json!({"id": 1, "username": "a", "email": "a@b.c", "city": "New York"});
        let errors = SchemaValidator::strict().validate(&value, &user_schema());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::UnknownField);
        assert!(errors[0].path.ends_with_key("city"));
    }

    #[test]
    fn test_missing_required_field_reports_once() {
        let schema = ObjectSchema::new()
            .required_property(
                "profile",
                ObjectSchema::new()
                    .required_property("name", Schema::string())
                    .required_property("age", Schema::integer())
                    .build(),
            )
            .build();

        let errors = validate(&json!({}), &schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::MissingField);
        assert!(errors[0].path.ends_with_key("profile"));
        assert_eq!(errors[0].expected_type.as_deref(), Some("object"));
    }

    #[test]
    fn test_type_mismatch_stops_descent() {
        let schema = ObjectSchema::new()
            .required_property(
                "profile",
                ObjectSchema::new().required_property("name", Schema::string()).build(),
            )
            .build();

        let errors = validate(&json!({"profile": "oops"}), &schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::TypeMismatch);
        assert_eq!(errors[0].expected_type.as_deref(), Some("object"));
        assert_eq!(errors[0].actual_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let value = json!({"id": "1", "username": 7, "email": "nope", "age": -3});
        let errors = validate(&value, &user_schema());

        let summary: Vec<(String, ViolationKind)> =
            errors.iter().map(|e| (e.path.to_string(), e.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("$.age".to_string(), ViolationKind::RangeViolation),
                ("$.email".to_string(), ViolationKind::FormatViolation),
                ("$.id".to_string(), ViolationKind::TypeMismatch),
                ("$.username".to_string(), ViolationKind::TypeMismatch),
            ]
        );
    }

    #[test]
    fn test_array_items_carry_index() {
        let schema = ObjectSchema::new()
            .required_property(
                "users",
                Schema::array(ObjectSchema::new().required_property("id", Schema::integer()).build()),
            )
            .build();

        let value = json!({"users": [{"id": 1}, {"id": "two"}, {}]});
        let errors = validate(&value, &schema);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path.to_string(), "$.users[1].id");
        assert_eq!(errors[1].path.to_string(), "$.users[2].id");
        assert_eq!(errors[1].kind, ViolationKind::MissingField);
    }

    #[test]
    fn test_integer_satisfies_number() {
        assert!(validate(&json!(3), &Schema::number()).is_empty());
        assert_eq!(validate(&json!(3.5), &Schema::integer()).len(), 1);
    }

    #[test]
    fn test_enum_membership() {
        let schema = Schema::typed_enum(Schema::string(), vec![json!("pending"), json!("confirmed")]);

        assert!(validate(&json!("pending"), &schema).is_empty());
        let errors = validate(&json!("shipped"), &schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::EnumViolation);

        // Wrong type reports the mismatch only.
        let errors = validate(&json!(3), &schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_string_length_bounds() {
        let schema = StringSchema::new().min_length(3).max_length(5).build();
        assert!(validate(&json!("abcd"), &schema).is_empty());
        assert_eq!(validate(&json!("ab"), &schema)[0].kind, ViolationKind::LengthViolation);
        assert_eq!(validate(&json!("abcdef"), &schema)[0].kind, ViolationKind::LengthViolation);
    }

    #[test]
    fn test_format_checks_can_be_disabled() {
        let validator = SchemaValidator::with_config(ValidationConfig {
            check_formats: false,
            ..ValidationConfig::default()
        });
        assert!(validator.is_valid(&json!("not-an-email"), &Schema::email()));
    }

    #[test]
    fn test_path_display_and_serialization() {
        let path = FieldPath::root().key("users").index(0).key("id");
        assert_eq!(path.to_string(), "$.users[0].id");
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["users", 0, "id"]));
    }
}
