//! Schema model, validation, inference and sample generation.
//!
//! This module provides:
//! - [`Schema`], a tagged variant over the supported value types
//! - [`SchemaValidator`] producing path-located [`ValidationError`]s
//! - [`infer_schema`] for turning example bodies into type-only schemas
//! - [`sample_value`] for synthesising request bodies

mod format;
mod inference;
mod parse;
mod sample;
mod types;
mod validator;

pub use inference::{infer_schema, infer_schema_with, InferenceOptions};
pub use sample::sample_value;
pub use types::{
    ArraySchema, EnumSchema, NumericSchema, ObjectSchema, Schema, SchemaType, StringFormat,
    StringSchema,
};
pub use validator::{
    validate, FieldPath, PathSegment, SchemaValidator, ValidationError, ViolationKind,
};
