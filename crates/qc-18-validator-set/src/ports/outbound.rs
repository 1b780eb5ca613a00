//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Both ports receive calls only after the owning transaction has committed,
//! so a rejected transaction never leaks instructions or events.

use crate::domain::PoolInstruction;
use crate::events::ValidatorSetEvent;

/// External pool ledger
///
/// Every bonding status transition and every power change moves tokens
/// between the bonded and not-bonded buckets. The engine keeps its own
/// mirror and sends the same instruction here.
pub trait PoolLedger: Send + Sync {
    fn apply(&self, instruction: PoolInstruction);
}

/// Lifecycle event consumer (staking hooks)
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ValidatorSetEvent);
}
