//! Observability utilities.

mod subscriber;
mod tracing;

pub use self::subscriber::init_tracing;
pub use self::tracing::{SpanTimer, VerificationSpanAttributes};
