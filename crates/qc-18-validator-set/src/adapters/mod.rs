//! Adapters layer
//!
//! In-memory implementations of the outbound ports.

pub mod event_sink;
pub mod pool_ledger;

pub use event_sink::InMemoryEventSink;
pub use pool_ledger::InMemoryPoolLedger;
