//! Typed verification events.

use serde::{Deserialize, Serialize};

/// Something that happened during a verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VerificationEvent {
    /// A run began.
    Started {
        /// Number of consumers in the run.
        consumers: usize,
        /// Total interactions across consumers.
        interactions: usize,
    },
    /// One interaction was checked.
    InteractionVerified {
        /// Consumer that owns the interaction.
        consumer: String,
        /// Interaction description.
        interaction: String,
        /// Whether it passed.
        passed: bool,
        /// Wall-clock time spent, in milliseconds.
        duration_ms: f64,
    },
    /// Every interaction of a consumer was checked.
    ConsumerVerified {
        /// Consumer name.
        consumer: String,
        /// Interactions that passed.
        passed: usize,
        /// Interactions that failed.
        failed: usize,
    },
    /// The run was cancelled before finishing.
    Cancelled {
        /// Cancellation reason.
        reason: String,
        /// Interactions that were never run.
        not_run: usize,
    },
    /// The run finished.
    Completed {
        /// Interactions that passed.
        passed: usize,
        /// Interactions that failed.
        failed: usize,
        /// Whether a previously passing interaction now fails.
        breaking_change: bool,
    },
}

impl VerificationEvent {
    /// Dotted event type, e.g. `interaction.verified`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "verification.started",
            Self::InteractionVerified { .. } => "interaction.verified",
            Self::ConsumerVerified { .. } => "consumer.verified",
            Self::Cancelled { .. } => "verification.cancelled",
            Self::Completed { .. } => "verification.completed",
        }
    }
}
