//! Core HTTP value types shared by every component.
//!
//! This module contains:
//! - Request values as seen by matchers and exchange providers
//! - Exchanges returned by the transport collaborator
//! - Case-insensitive header helpers

mod exchange;
mod headers;
mod request;

pub use exchange::Exchange;
pub use headers::{header_value, normalize_method, Headers};
pub use request::HttpRequest;
