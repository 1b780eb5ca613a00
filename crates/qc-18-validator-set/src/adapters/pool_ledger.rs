//! Pool ledger adapter
//!
//! Implements the PoolLedger port by replaying instructions onto a local
//! `Pool`, which lets tests compare the ledger with the engine's mirror.

use crate::domain::{Pool, PoolBucket, PoolInstruction};
use crate::ports::PoolLedger;
use parking_lot::RwLock;

/// In-memory pool ledger
pub struct InMemoryPoolLedger {
    pool: RwLock<Pool>,
    instructions: RwLock<Vec<PoolInstruction>>,
}

impl InMemoryPoolLedger {
    pub fn new() -> Self {
        Self {
            pool: RwLock::new(Pool::new()),
            instructions: RwLock::new(Vec::new()),
        }
    }

    pub fn pool(&self) -> Pool {
        *self.pool.read()
    }

    pub fn instructions(&self) -> Vec<PoolInstruction> {
        self.instructions.read().clone()
    }

    fn bucket(pool: &mut Pool, bucket: PoolBucket) -> &mut u128 {
        match bucket {
            PoolBucket::Bonded => &mut pool.bonded_tokens,
            PoolBucket::NotBonded => &mut pool.not_bonded_tokens,
        }
    }
}

impl Default for InMemoryPoolLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolLedger for InMemoryPoolLedger {
    fn apply(&self, instruction: PoolInstruction) {
        let mut pool = self.pool.write();
        match instruction {
            PoolInstruction::Credit { bucket, amount } => {
                let slot = Self::bucket(&mut pool, bucket);
                *slot = slot.saturating_add(amount);
            }
            PoolInstruction::Debit { bucket, amount } => {
                let slot = Self::bucket(&mut pool, bucket);
                *slot = slot.saturating_sub(amount);
            }
            PoolInstruction::Move { from, to, amount } => {
                let slot = Self::bucket(&mut pool, from);
                *slot = slot.saturating_sub(amount);
                let slot = Self::bucket(&mut pool, to);
                *slot = slot.saturating_add(amount);
            }
        }
        self.instructions.write().push(instruction);
    }
}
