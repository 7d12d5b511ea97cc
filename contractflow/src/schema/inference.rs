//! Structural schema inference from example values.
//!
//! Inference is type-only: it never marks fields required and never infers
//! enumerations. Callers that want example fields enforced apply
//! [`Schema::require_all_properties`] afterwards.

use super::types::{ArraySchema, ObjectSchema, Schema, SchemaType};

/// Options controlling inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Treat string values naming a type (`"integer"`, `"array"`, ...) as that type.
    pub type_placeholders: bool,
}

impl InferenceOptions {
    /// Enables type-name placeholders.
    #[must_use]
    pub fn with_type_placeholders(mut self) -> Self {
        self.type_placeholders = true;
        self
    }
}

/// Infers a type-only schema from an example value.
#[must_use]
pub fn infer_schema(example: &serde_json::Value) -> Schema {
    infer_schema_with(example, InferenceOptions::default())
}

/// Infers a schema with explicit options.
#[must_use]
pub fn infer_schema_with(example: &serde_json::Value, options: InferenceOptions) -> Schema {
    match example {
        serde_json::Value::Null => Schema::Null,
        serde_json::Value::Bool(_) => Schema::Boolean,
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Schema::integer(),
        serde_json::Value::Number(_) => Schema::number(),
        serde_json::Value::String(s) => {
            if options.type_placeholders {
                if let Some(placeholder) = SchemaType::parse(s) {
                    return placeholder_schema(placeholder);
                }
            }
            Schema::string()
        }
        serde_json::Value::Array(elements) => Schema::Array(ArraySchema {
            items: elements
                .first()
                .map(|first| Box::new(infer_schema_with(first, options))),
        }),
        serde_json::Value::Object(fields) => Schema::Object(ObjectSchema {
            properties: fields
                .iter()
                .map(|(name, value)| (name.clone(), infer_schema_with(value, options)))
                .collect(),
            required: std::collections::BTreeSet::new(),
        }),
    }
}

fn placeholder_schema(schema_type: SchemaType) -> Schema {
    match schema_type {
        SchemaType::Object => ObjectSchema::new().build(),
        SchemaType::Array => Schema::any_array(),
        SchemaType::String => Schema::string(),
        SchemaType::Integer => Schema::integer(),
        SchemaType::Number => Schema::number(),
        SchemaType::Boolean => Schema::Boolean,
        SchemaType::Null => Schema::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_infer_scalars() {
        assert_eq!(infer_schema(&json!(1)), Schema::integer());
        assert_eq!(infer_schema(&json!(1.5)), Schema::number());
        assert_eq!(infer_schema(&json!("x")), Schema::string());
        assert_eq!(infer_schema(&json!(true)), Schema::Boolean);
        assert_eq!(infer_schema(&json!(null)), Schema::Null);
    }

    #[test]
    fn test_infer_object_is_type_only() {
        let schema = infer_schema(&json!({"id": 1, "tags": ["a"]}));
        let expected = ObjectSchema::new()
            .property("id", Schema::integer())
            .property("tags", Schema::array(Schema::string()))
            .build();
        assert_eq!(schema, expected);
        assert!(validate(&json!({}), &schema).is_empty());
    }

    #[test]
    fn test_empty_array_accepts_anything() {
        let schema = infer_schema(&json!([]));
        assert_eq!(schema, Schema::any_array());
        assert!(validate(&json!([1, "two"]), &schema).is_empty());
    }

    #[test]
    fn test_type_placeholders() {
        let options = InferenceOptions::default().with_type_placeholders();
        let schema = infer_schema_with(&json!({"orders": "array", "count": "integer", "name": "john"}), options);

        assert!(validate(&json!({"orders": [{"id": 1}], "count": 2, "name": "jane"}), &schema).is_empty());
        assert_eq!(validate(&json!({"orders": 2}), &schema).len(), 1);
    }

    #[test]
    fn test_inferred_example_validates_itself() {
        let example = json!({"users": [{"id": 1, "email": "a@b.c"}], "count": 1, "ratio": 0.5});
        assert!(validate(&example, &infer_schema(&example)).is_empty());
    }
}
