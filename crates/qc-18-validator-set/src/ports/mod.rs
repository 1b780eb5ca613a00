//! Ports layer (Hexagonal Architecture)
//!
//! - inbound: API exposed to the staking transaction handlers
//! - outbound: pool ledger and event sink this subsystem drives

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
