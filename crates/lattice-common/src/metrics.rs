//! Metrics for the authentication layer
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! these are no-ops.

use metrics::{counter, gauge};

/// Record the outcome of one authentication attempt
pub fn record_auth_outcome(scheme: &'static str, outcome: &'static str) {
    counter!("lattice_auth_outcomes_total", "scheme" => scheme, "outcome" => outcome).increment(1);
}

/// Update the number of tokens held by the bearer authenticator
#[allow(clippy::cast_precision_loss)]
pub fn set_token_table_size(entries: usize) {
    gauge!("lattice_auth_token_table_size").set(entries as f64);
}
