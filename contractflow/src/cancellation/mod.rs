//! Cooperative cancellation for verification batches.

mod token;

pub use token::CancellationToken;
