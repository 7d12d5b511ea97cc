//! Schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::SchemaDefinitionError;

/// The fixed set of value types a schema can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON string.
    String,
    /// Whole number.
    Integer,
    /// Any number, integers included.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
}

impl SchemaType {
    /// Returns the canonical lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Parses a type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The most precise type of a JSON value.
    #[must_use]
    pub fn of_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }

    /// Whether a value satisfies this type.
    ///
    /// Integers satisfy `number`; integral floats such as `1.0` satisfy `integer`.
    #[must_use]
    pub fn accepts(self, value: &serde_json::Value) -> bool {
        let actual = Self::of_value(value);
        match self {
            Self::Number => matches!(actual, Self::Number | Self::Integer),
            Self::Integer => {
                actual == Self::Integer
                    || value
                        .as_f64()
                        .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
            }
            other => other == actual,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight string formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StringFormat {
    /// `local@domain.tld`.
    Email,
    /// RFC 4122 UUID.
    Uuid,
    /// RFC 3339 timestamp.
    DateTime,
    /// `YYYY-MM-DD`.
    Date,
    /// Absolute URI with a scheme.
    Uri,
    /// Any other format name; accepted without checks.
    Other(String),
}

impl StringFormat {
    /// Returns the format name as written in schema documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Uri => "uri",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for StringFormat {
    fn from(name: String) -> Self {
        match name.as_str() {
            "email" => Self::Email,
            "uuid" => Self::Uuid,
            "date-time" => Self::DateTime,
            "date" => Self::Date,
            "uri" => Self::Uri,
            _ => Self::Other(name),
        }
    }
}

impl From<StringFormat> for String {
    fn from(format: StringFormat) -> Self {
        format.as_str().to_string()
    }
}

/// Object schema: declared properties and the subset that is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Declared properties.
    pub properties: BTreeMap<String, Schema>,
    /// Required property names; always a subset of `properties` keys.
    pub required: BTreeSet<String>,
}

impl ObjectSchema {
    /// Creates an object schema with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an optional property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declares a required property.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema::Object(self)
    }
}

/// Array schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    /// Schema every element must satisfy. `None` accepts any element.
    pub items: Option<Box<Schema>>,
}

/// String schema with format-lite constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    /// Expected format.
    pub format: Option<StringFormat>,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
}

impl StringSchema {
    /// Creates an unconstrained string schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the format.
    #[must_use]
    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema::String(self)
    }
}

/// Bounds shared by `integer` and `number` schemas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSchema {
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
}

/// Enumerated values, optionally on top of a typed base schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// Type and constraints checked before membership.
    pub base: Option<Box<Schema>>,
    /// Allowed values, compared by JSON equality.
    pub values: Vec<serde_json::Value>,
}

/// A structural description of expected data shape.
///
/// Each variant carries only the fields relevant to it. Schemas are pure
/// values compared structurally. Serde reads and writes the same
/// JSON-Schema-like documents as [`Schema::from_json`] and [`Schema::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Schema {
    /// JSON object with properties.
    Object(ObjectSchema),
    /// JSON array.
    Array(ArraySchema),
    /// String with optional format and length bounds.
    String(StringSchema),
    /// Whole number.
    Integer(NumericSchema),
    /// Any number.
    Number(NumericSchema),
    /// Boolean.
    Boolean,
    /// Null.
    Null,
    /// Closed set of allowed values.
    Enum(EnumSchema),
    /// Accepts anything.
    Any,
}

impl Schema {
    /// Unconstrained string.
    #[must_use]
    pub fn string() -> Self {
        Self::String(StringSchema::default())
    }

    /// Unbounded integer.
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer(NumericSchema::default())
    }

    /// Unbounded number.
    #[must_use]
    pub fn number() -> Self {
        Self::Number(NumericSchema::default())
    }

    /// Boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean
    }

    /// Null.
    #[must_use]
    pub fn null() -> Self {
        Self::Null
    }

    /// Accepts anything.
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// Array whose elements satisfy `items`.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self::Array(ArraySchema {
            items: Some(Box::new(items)),
        })
    }

    /// Array with unconstrained elements.
    #[must_use]
    pub fn any_array() -> Self {
        Self::Array(ArraySchema::default())
    }

    /// String with an email format.
    #[must_use]
    pub fn email() -> Self {
        StringSchema::new().format(StringFormat::Email).build()
    }

    /// Untyped enumeration.
    #[must_use]
    pub fn one_of(values: Vec<serde_json::Value>) -> Self {
        Self::Enum(EnumSchema { base: None, values })
    }

    /// Enumeration on top of a typed schema.
    #[must_use]
    pub fn typed_enum(base: Schema, values: Vec<serde_json::Value>) -> Self {
        Self::Enum(EnumSchema {
            base: Some(Box::new(base)),
            values,
        })
    }

    /// Integer with inclusive bounds.
    #[must_use]
    pub fn integer_between(minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self::Integer(NumericSchema { minimum, maximum })
    }

    /// The type this schema demands, if any.
    #[must_use]
    pub fn schema_type(&self) -> Option<SchemaType> {
        match self {
            Self::Object(_) => Some(SchemaType::Object),
            Self::Array(_) => Some(SchemaType::Array),
            Self::String(_) => Some(SchemaType::String),
            Self::Integer(_) => Some(SchemaType::Integer),
            Self::Number(_) => Some(SchemaType::Number),
            Self::Boolean => Some(SchemaType::Boolean),
            Self::Null => Some(SchemaType::Null),
            Self::Enum(e) => e.base.as_ref().and_then(|b| b.schema_type()),
            Self::Any => None,
        }
    }

    /// Returns the object part of this schema, if it is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Checks the model invariants recursively.
    ///
    /// `required` must be a subset of `properties`, enums must list at least
    /// one value, and bounds must not be inverted.
    pub fn check(&self) -> Result<(), SchemaDefinitionError> {
        self.check_at("$")
    }

    fn check_at(&self, path: &str) -> Result<(), SchemaDefinitionError> {
        match self {
            Self::Object(obj) => {
                if let Some(missing) = obj.required.iter().find(|r| !obj.properties.contains_key(*r)) {
                    return Err(SchemaDefinitionError::new(
                        path,
                        format!("required field '{missing}' is not declared in properties"),
                    ));
                }
                for (name, prop) in &obj.properties {
                    prop.check_at(&format!("{path}.properties.{name}"))?;
                }
                Ok(())
            }
            Self::Array(arr) => match &arr.items {
                Some(items) => items.check_at(&format!("{path}.items")),
                None => Ok(()),
            },
            Self::String(s) => match (s.min_length, s.max_length) {
                (Some(min), Some(max)) if min > max => Err(SchemaDefinitionError::new(
                    path,
                    format!("minLength {min} exceeds maxLength {max}"),
                )),
                _ => Ok(()),
            },
            Self::Integer(n) | Self::Number(n) => match (n.minimum, n.maximum) {
                (Some(min), Some(max)) if min > max => Err(SchemaDefinitionError::new(
                    path,
                    format!("minimum {min} exceeds maximum {max}"),
                )),
                _ => Ok(()),
            },
            Self::Enum(e) => {
                if e.values.is_empty() {
                    return Err(SchemaDefinitionError::new(path, "enum must list at least one value"));
                }
                match &e.base {
                    Some(base) => base.check_at(path),
                    None => Ok(()),
                }
            }
            Self::Boolean | Self::Null | Self::Any => Ok(()),
        }
    }

    /// Marks every declared object property as required, recursively.
    #[must_use]
    pub fn require_all_properties(self) -> Self {
        match self {
            Self::Object(obj) => {
                let required = obj.properties.keys().cloned().collect();
                let properties = obj
                    .properties
                    .into_iter()
                    .map(|(name, prop)| (name, prop.require_all_properties()))
                    .collect();
                Self::Object(ObjectSchema { properties, required })
            }
            Self::Array(ArraySchema { items }) => Self::Array(ArraySchema {
                items: items.map(|items| Box::new(items.require_all_properties())),
            }),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_widening() {
        assert!(SchemaType::Number.accepts(&json!(3)));
        assert!(SchemaType::Number.accepts(&json!(3.5)));
        assert!(SchemaType::Integer.accepts(&json!(3)));
        assert!(SchemaType::Integer.accepts(&json!(3.0)));
        assert!(!SchemaType::Integer.accepts(&json!(3.5)));
        assert!(!SchemaType::String.accepts(&json!(3)));
    }

    #[test]
    fn test_check_rejects_undeclared_required() {
        let mut obj = ObjectSchema::new().property("id", Schema::integer());
        obj.required.insert("email".to_string());

        let err = obj.build().check().unwrap_err();
        assert!(err.message.contains("email"));
        assert_eq!(err.path, "$");
    }

    #[test]
    fn test_check_nested_path() {
        let schema = ObjectSchema::new()
            .property("tags", Schema::array(Schema::one_of(vec![])))
            .build();

        let err = schema.check().unwrap_err();
        assert_eq!(err.path, "$.properties.tags.items");
    }

    #[test]
    fn test_require_all_properties_is_recursive() {
        let schema = ObjectSchema::new()
            .property("id", Schema::integer())
            .property(
                "items",
                Schema::array(ObjectSchema::new().property("sku", Schema::string()).build()),
            )
            .build()
            .require_all_properties();

        let obj = schema.as_object().unwrap();
        assert!(obj.required.contains("id"));
        assert!(obj.required.contains("items"));
        let Schema::Array(arr) = &obj.properties["items"] else {
            panic!("expected array");
        };
        let inner = arr.items.as_ref().unwrap().as_object().unwrap();
        assert!(inner.required.contains("sku"));
    }

    #[test]
    fn test_enum_type_comes_from_base() {
        let schema = Schema::typed_enum(Schema::string(), vec![json!("pending")]);
        assert_eq!(schema.schema_type(), Some(SchemaType::String));
        assert_eq!(Schema::one_of(vec![json!(1)]).schema_type(), None);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(StringFormat::from("date-time".to_string()), StringFormat::DateTime);
        assert_eq!(
            StringFormat::from("hostname".to_string()),
            StringFormat::Other("hostname".to_string())
        );
    }
}
