//! # Validator Set Metrics
//!
//! Prometheus metrics for monitoring bonded set churn.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-validator-set = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `validator_set_bonded_count` - Gauge of bonded validators after each committed block
//! - `validator_set_promotions_total` - Counter of validators entering the bonded set
//! - `validator_set_demotions_total` - Counter of validators leaving the bonded set
//! - `validator_set_updates_flushed_total` - Counter of power updates handed to consensus
//! - `validator_set_rejected_total` - Counter of rejected transactions (by reason)
//! - `validator_set_fatal_total` - Counter of fatal invariant breaches (by reason)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_int_counter, register_int_gauge, CounterVec, IntCounter,
    IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Bonded validators after the last committed block
    pub static ref BONDED_COUNT: IntGauge = register_int_gauge!(
        "validator_set_bonded_count",
        "Number of bonded validators after the last committed block"
    )
    .expect("Failed to create BONDED_COUNT metric");

    /// Total promotions into the bonded set
    pub static ref PROMOTIONS: IntCounter = register_int_counter!(
        "validator_set_promotions_total",
        "Total number of validators promoted into the bonded set"
    )
    .expect("Failed to create PROMOTIONS metric");

    /// Total demotions out of the bonded set
    pub static ref DEMOTIONS: IntCounter = register_int_counter!(
        "validator_set_demotions_total",
        "Total number of validators demoted out of the bonded set"
    )
    .expect("Failed to create DEMOTIONS metric");

    /// Total power updates flushed to consensus
    pub static ref UPDATES_FLUSHED: IntCounter = register_int_counter!(
        "validator_set_updates_flushed_total",
        "Total number of validator power updates flushed at block end"
    )
    .expect("Failed to create UPDATES_FLUSHED metric");

    /// Rejected transactions, labeled by reason
    pub static ref REJECTED: CounterVec = register_counter_vec!(
        "validator_set_rejected_total",
        "Total number of rejected validator set transactions",
        &["reason"]
    )
    .expect("Failed to create REJECTED metric");

    /// Fatal invariant breaches, labeled by reason
    pub static ref FATAL: CounterVec = register_counter_vec!(
        "validator_set_fatal_total",
        "Total number of fatal invariant breaches",
        &["reason"]
    )
    .expect("Failed to create FATAL metric");
}

#[cfg(feature = "metrics")]
pub fn set_bonded_count(count: usize) {
    BONDED_COUNT.set(count as i64);
}

#[cfg(feature = "metrics")]
pub fn record_promotion() {
    PROMOTIONS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_demotion() {
    DEMOTIONS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_updates_flushed(count: usize) {
    UPDATES_FLUSHED.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_rejected(reason: &str) {
    REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_fatal(reason: &str) {
    FATAL.with_label_values(&[reason]).inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn set_bonded_count(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_promotion() {}

#[cfg(not(feature = "metrics"))]
pub fn record_demotion() {}

#[cfg(not(feature = "metrics"))]
pub fn record_updates_flushed(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_fatal(_reason: &str) {}
