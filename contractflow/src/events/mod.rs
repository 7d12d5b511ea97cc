//! Verification events and the sinks that receive them.
//!
//! Sinks are injected per verifier instance; there is no process-wide sink.

mod event;
mod sink;

pub use event::VerificationEvent;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
