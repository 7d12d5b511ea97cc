//! Conversion between JSON-Schema-like documents and [`Schema`] values.
//!
//! Only the subset the engine validates is understood: `type`, `required`,
//! `properties`, `items`, `enum`, `format`, `minLength`, `maxLength`,
//! `minimum` and `maximum`. Other keywords are ignored.

use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::types::{
    ArraySchema, EnumSchema, NumericSchema, ObjectSchema, Schema, SchemaType, StringFormat,
    StringSchema,
};
use crate::errors::SchemaDefinitionError;

impl Schema {
    /// Parses a schema document, failing fast on malformed definitions.
    pub fn from_json(doc: &Value) -> Result<Self, SchemaDefinitionError> {
        let schema = parse_node(doc, "$")?;
        schema.check()?;
        Ok(schema)
    }

    /// Renders the schema back into a JSON-Schema-like document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Object(obj) => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("object"));
                if !obj.properties.is_empty() {
                    let props: Map<String, Value> = obj
                        .properties
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_json()))
                        .collect();
                    doc.insert("properties".into(), Value::Object(props));
                }
                if !obj.required.is_empty() {
                    doc.insert("required".into(), json!(obj.required));
                }
                Value::Object(doc)
            }
            Self::Array(arr) => match &arr.items {
                Some(items) => json!({"type": "array", "items": items.to_json()}),
                None => json!({"type": "array"}),
            },
            Self::String(s) => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("string"));
                if let Some(format) = &s.format {
                    doc.insert("format".into(), json!(format.as_str()));
                }
                if let Some(min) = s.min_length {
                    doc.insert("minLength".into(), json!(min));
                }
                if let Some(max) = s.max_length {
                    doc.insert("maxLength".into(), json!(max));
                }
                Value::Object(doc)
            }
            Self::Integer(n) => numeric_doc("integer", n),
            Self::Number(n) => numeric_doc("number", n),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Null => json!({"type": "null"}),
            Self::Enum(e) => {
                let mut doc = match e.base.as_deref().map(Self::to_json) {
                    Some(Value::Object(base)) => base,
                    _ => Map::new(),
                };
                doc.insert("enum".into(), Value::Array(e.values.clone()));
                Value::Object(doc)
            }
            Self::Any => json!({}),
        }
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaDefinitionError;

    fn try_from(doc: Value) -> Result<Self, Self::Error> {
        Self::from_json(&doc)
    }
}

impl From<Schema> for Value {
    fn from(schema: Schema) -> Self {
        schema.to_json()
    }
}

fn numeric_doc(type_name: &str, n: &NumericSchema) -> Value {
    let mut doc = Map::new();
    doc.insert("type".into(), json!(type_name));
    if let Some(min) = n.minimum {
        doc.insert("minimum".into(), json!(min));
    }
    if let Some(max) = n.maximum {
        doc.insert("maximum".into(), json!(max));
    }
    Value::Object(doc)
}

fn parse_node(doc: &Value, path: &str) -> Result<Schema, SchemaDefinitionError> {
    let node = match doc {
        Value::Object(node) => node,
        Value::Bool(true) => return Ok(Schema::Any),
        other => {
            return Err(SchemaDefinitionError::new(
                path,
                format!("schema must be an object, found {}", SchemaType::of_value(other)),
            ))
        }
    };

    let declared = match node.get("type") {
        None => None,
        Some(Value::String(name)) => Some(SchemaType::parse(name).ok_or_else(|| {
            SchemaDefinitionError::new(path, format!("unknown type '{name}'"))
        })?),
        Some(Value::Array(_)) => {
            return Err(SchemaDefinitionError::new(path, "type unions are not supported"))
        }
        Some(other) => {
            return Err(SchemaDefinitionError::new(
                path,
                format!("type must be a string, found {}", SchemaType::of_value(other)),
            ))
        }
    };

    // Untyped documents are read by the keywords they carry.
    let inferred = declared.or_else(|| {
        if node.contains_key("properties") || node.contains_key("required") {
            Some(SchemaType::Object)
        } else if node.contains_key("items") {
            Some(SchemaType::Array)
        } else {
            None
        }
    });

    if node.contains_key("items") && inferred != Some(SchemaType::Array) {
        return Err(SchemaDefinitionError::new(path, "'items' is only valid on array schemas"));
    }
    if node.contains_key("properties") && inferred != Some(SchemaType::Object) {
        return Err(SchemaDefinitionError::new(
            path,
            "'properties' is only valid on object schemas",
        ));
    }

    let base = match inferred {
        Some(SchemaType::Object) => Schema::Object(parse_object(node, path)?),
        Some(SchemaType::Array) => {
            let items = match node.get("items") {
                Some(items) => Some(Box::new(parse_node(items, &format!("{path}.items"))?)),
                None => None,
            };
            Schema::Array(ArraySchema { items })
        }
        Some(SchemaType::String) => Schema::String(StringSchema {
            format: node
                .get("format")
                .and_then(Value::as_str)
                .map(|f| StringFormat::from(f.to_string())),
            min_length: read_usize(node, "minLength", path)?,
            max_length: read_usize(node, "maxLength", path)?,
        }),
        Some(SchemaType::Integer) => Schema::Integer(parse_bounds(node, path)?),
        Some(SchemaType::Number) => Schema::Number(parse_bounds(node, path)?),
        Some(SchemaType::Boolean) => Schema::Boolean,
        Some(SchemaType::Null) => Schema::Null,
        None => Schema::Any,
    };

    match node.get("enum") {
        None => Ok(base),
        Some(Value::Array(values)) => Ok(Schema::Enum(EnumSchema {
            base: (base != Schema::Any).then(|| Box::new(base)),
            values: values.clone(),
        })),
        Some(_) => Err(SchemaDefinitionError::new(path, "enum must be an array")),
    }
}

fn parse_object(node: &Map<String, Value>, path: &str) -> Result<ObjectSchema, SchemaDefinitionError> {
    let mut properties = BTreeMap::new();
    match node.get("properties") {
        None => {}
        Some(Value::Object(props)) => {
            for (name, prop) in props {
                let schema = parse_node(prop, &format!("{path}.properties.{name}"))?;
                properties.insert(name.clone(), schema);
            }
        }
        Some(_) => {
            return Err(SchemaDefinitionError::new(path, "properties must be an object"));
        }
    }

    let mut required = BTreeSet::new();
    match node.get("required") {
        None => {}
        Some(Value::Array(names)) => {
            for name in names {
                let name = name.as_str().ok_or_else(|| {
                    SchemaDefinitionError::new(path, "required must list field names")
                })?;
                required.insert(name.to_string());
            }
        }
        Some(_) => {
            return Err(SchemaDefinitionError::new(path, "required must be an array"));
        }
    }

    Ok(ObjectSchema { properties, required })
}

fn parse_bounds(node: &Map<String, Value>, path: &str) -> Result<NumericSchema, SchemaDefinitionError> {
    let read = |key: &str| -> Result<Option<f64>, SchemaDefinitionError> {
        match node.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| SchemaDefinitionError::new(path, format!("{key} must be a number"))),
        }
    };
    Ok(NumericSchema {
        minimum: read("minimum")?,
        maximum: read("maximum")?,
    })
}

fn read_usize(
    node: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<usize>, SchemaDefinitionError> {
    match node.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                SchemaDefinitionError::new(path, format!("{key} must be a non-negative integer"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_user_schema() {
        let schema = Schema::from_json(&json!({
            "type": "object",
            "required": ["id", "username", "email"],
            "properties": {
                "id": {"type": "integer"},
                "username": {"type": "string", "minLength": 3},
                "email": {"type": "string", "format": "email"}
            }
        }))
        .unwrap();

        let expected = ObjectSchema::new()
            .required_property("id", Schema::integer())
            .required_property("username", StringSchema::new().min_length(3).build())
            .required_property("email", Schema::email())
            .build();
        assert_eq!(schema, expected);
    }

    #[test]
    fn test_parse_typed_enum() {
        let schema = Schema::from_json(&json!({"type": "string", "enum": ["pending", "confirmed"]})).unwrap();
        assert_eq!(
            schema,
            Schema::typed_enum(Schema::string(), vec![json!("pending"), json!("confirmed")])
        );
    }

    #[test]
    fn test_untyped_with_properties_is_object() {
        let schema = Schema::from_json(&json!({"properties": {"id": {}}, "required": ["id"]})).unwrap();
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.properties["id"], Schema::Any);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = Schema::from_json(&json!({"type": "object", "properties": {"id": {"type": "int"}}})).unwrap_err();
        assert_eq!(err.path, "$.properties.id");
        assert!(err.message.contains("int"));
    }

    #[test]
    fn test_rejects_required_outside_properties() {
        let err = Schema::from_json(&json!({"type": "object", "required": ["id"]})).unwrap_err();
        assert!(err.message.contains("'id'"));
    }

    #[test]
    fn test_rejects_items_on_object() {
        let err = Schema::from_json(&json!({"type": "object", "items": {}})).unwrap_err();
        assert!(err.message.contains("items"));
    }

    #[test]
    fn test_rejects_negative_length() {
        assert!(Schema::from_json(&json!({"type": "string", "minLength": -1})).is_err());
    }

    #[test]
    fn test_serde_reads_json_schema_documents() {
        let schema: Schema =
            serde_json::from_value(json!({"type": "string", "enum": ["pending"], "minLength": 3})).unwrap();
        assert_eq!(
            schema,
            Schema::typed_enum(StringSchema::new().min_length(3).build(), vec![json!("pending")])
        );
        assert_eq!(crate::schema::validate(&json!("x"), &schema).len(), 2);
        assert_eq!(serde_json::to_value(&schema).unwrap(), schema.to_json());
    }

    #[test]
    fn test_serde_rejects_malformed_documents() {
        let result = serde_json::from_value::<Schema>(json!({"type": "object", "required": ["id"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_schema_survives_interaction_serde() {
        let response: crate::contracts::InteractionResponse = serde_json::from_value(json!({
            "status": 200,
            "schema": {
                "type": "object",
                "properties": {"status": {"type": "string", "enum": ["ok"]}}
            }
        }))
        .unwrap();
        let schema = response.schema.unwrap();
        let errors = crate::schema::validate(&json!({"status": "down"}), &schema);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_to_json_roundtrip() {
        let doc = json!({
            "type": "object",
            "required": ["users"],
            "properties": {
                "users": {"type": "array", "items": {"type": "object", "properties": {"id": {"type": "integer", "minimum": 0.0}}}},
                "status": {"type": "string", "enum": ["ok"]}
            }
        });
        let schema = Schema::from_json(&doc).unwrap();
        assert_eq!(Schema::from_json(&schema.to_json()).unwrap(), schema);
    }
}
