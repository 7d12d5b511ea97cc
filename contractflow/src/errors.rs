//! Error types for the contractflow engine.
//!
//! Structural problems (duplicate names, malformed schemas, invalid
//! contracts) are returned as `Err` and fail fast at registration time.
//! Validation outcomes are never errors: they accumulate into
//! [`VerificationResult`](crate::validator::VerificationResult) values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, ContractflowError>;

/// The main error type for contractflow operations.
#[derive(Debug, Error)]
pub enum ContractflowError {
    /// A contract with the same name is already registered.
    #[error("Contract '{name}' is already registered")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// A lookup found nothing under the given name.
    #[error("Contract '{name}' not found")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// A schema definition is malformed.
    #[error("{0}")]
    InvalidSchema(#[from] SchemaDefinitionError),

    /// A contract definition violates a model invariant.
    #[error("Invalid contract '{name}': {reason}")]
    InvalidContract {
        /// The contract name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The exchange provider failed.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A verification batch was cancelled.
    #[error("Verification cancelled: {0}")]
    Cancelled(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractflowError {
    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates an invalid contract error.
    #[must_use]
    pub fn invalid_contract(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors a caller can recover from by renaming or skipping.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DuplicateName { .. } | Self::NotFound { .. })
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        let kind = match self {
            Self::DuplicateName { name } => {
                map.insert("name".to_string(), serde_json::json!(name));
                "DuplicateNameError"
            }
            Self::NotFound { name } => {
                map.insert("name".to_string(), serde_json::json!(name));
                "NotFoundError"
            }
            Self::InvalidSchema(err) => {
                map.insert("path".to_string(), serde_json::json!(err.path));
                "SchemaDefinitionError"
            }
            Self::InvalidContract { name, reason } => {
                map.insert("name".to_string(), serde_json::json!(name));
                map.insert("reason".to_string(), serde_json::json!(reason));
                "InvalidContractError"
            }
            Self::Transport(err) => {
                map.insert("transport".to_string(), serde_json::json!(err.kind()));
                "TransportError"
            }
            Self::Cancelled(_) => "CancelledError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
        };
        map.insert("type".to_string(), serde_json::json!(kind));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<serde_json::Error> for ContractflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error raised when a schema document cannot be turned into a [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid schema at '{path}': {message}")]
pub struct SchemaDefinitionError {
    /// JSON-pointer-like location of the offending node.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

impl SchemaDefinitionError {
    /// Creates a new schema definition error.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure of the exchange provider to produce an exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportError {
    /// The exchange did not complete in time.
    #[error("Exchange timed out after {after_ms}ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The provider could not be reached.
    #[error("Connection failed: {message}")]
    Connection {
        /// Underlying failure.
        message: String,
    },

    /// The provider answered with something that is not a usable response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Underlying failure.
        message: String,
    },
}

impl TransportError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Short machine-readable kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::Protocol { .. } => "protocol",
        }
    }
}
