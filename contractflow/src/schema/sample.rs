//! Sample values synthesised from schemas.

use serde_json::{json, Value};

use super::format;
use super::types::{Schema, StringSchema};

/// Builds a value for `schema`.
///
/// Objects get every declared property, arrays a single element, enums
/// their first member. The value satisfies the schema whenever some value
/// can: length bounds that no conforming literal of the format fits, or an
/// integer range containing no whole number, yield the closest candidate.
#[must_use]
pub fn sample_value(schema: &Schema) -> Value {
    match schema {
        Schema::Object(obj) => Value::Object(
            obj.properties
                .iter()
                .map(|(name, prop)| (name.clone(), sample_value(prop)))
                .collect(),
        ),
        Schema::Array(arr) => match &arr.items {
            Some(items) => json!([sample_value(items)]),
            None => json!([]),
        },
        Schema::String(s) => Value::String(sample_string(s)),
        Schema::Integer(n) => {
            let mut value = 1.0_f64;
            if let Some(min) = n.minimum {
                value = value.max(min.ceil());
            }
            if let Some(max) = n.maximum {
                value = value.min(max.floor());
            }
            #[allow(clippy::cast_possible_truncation)]
            let whole = value as i64;
            json!(whole)
        }
        Schema::Number(n) => {
            let mut value = 1.0_f64;
            if let Some(min) = n.minimum {
                value = value.max(min);
            }
            if let Some(max) = n.maximum {
                value = value.min(max);
            }
            json!(value)
        }
        Schema::Boolean => json!(true),
        Schema::Null | Schema::Any => Value::Null,
        Schema::Enum(e) => e.values.first().cloned().unwrap_or(Value::Null),
    }
}

fn sample_string(s: &StringSchema) -> String {
    let Some(fmt) = &s.format else {
        return fit_length("test_value", s);
    };
    let candidates: Vec<String> = format::examples_for(fmt)
        .iter()
        .map(|example| fit_length(example, s))
        .collect();
    candidates
        .iter()
        .find(|text| format::conforms(fmt, text))
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_default()
}

fn fit_length(seed: &str, s: &StringSchema) -> String {
    let mut text = seed.to_string();
    if let Some(min) = s.min_length {
        while text.chars().count() < min {
            text.push('x');
        }
    }
    if let Some(max) = s.max_length {
        text = text.chars().take(max).collect();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, ObjectSchema, StringSchema};

    #[test]
    fn test_sample_create_user_body() {
        let schema = ObjectSchema::new()
            .required_property("username", StringSchema::new().min_length(3).build())
            .required_property("email", Schema::email())
            .property("age", Schema::integer_between(Some(0.0), None))
            .build();

        let sample = sample_value(&schema);
        assert_eq!(sample["username"], "test_value");
        assert_eq!(sample["email"], "test@example.com");
        assert_eq!(sample["age"], 1);
        assert!(validate(&sample, &schema).is_empty());
    }

    #[test]
    fn test_sample_respects_bounds() {
        let schema = Schema::integer_between(Some(10.0), Some(20.0));
        assert_eq!(sample_value(&schema), json!(10));

        let short = StringSchema::new().max_length(2).build();
        assert_eq!(sample_value(&short), json!("te"));
    }

    #[test]
    fn test_sample_short_email_fits_max_length() {
        let schema = StringSchema::new()
            .format(crate::schema::StringFormat::Email)
            .max_length(6)
            .build();
        let sample = sample_value(&schema);
        assert_eq!(sample, json!("a@b.co"));
        assert!(validate(&sample, &schema).is_empty());
    }

    #[test]
    fn test_sample_padded_email_still_conforms() {
        let schema = StringSchema::new()
            .format(crate::schema::StringFormat::Email)
            .min_length(20)
            .build();
        let sample = sample_value(&schema);
        assert!(validate(&sample, &schema).is_empty());
    }

    #[test]
    fn test_sample_integer_with_fractional_bounds() {
        let schema = Schema::integer_between(Some(2.5), Some(4.5));
        let sample = sample_value(&schema);
        assert_eq!(sample, json!(3));
        assert!(validate(&sample, &schema).is_empty());
    }

    #[test]
    fn test_sample_enum_and_array() {
        let schema = Schema::array(Schema::typed_enum(Schema::string(), vec![json!("pending")]));
        assert_eq!(sample_value(&schema), json!(["pending"]));
    }
}
