//! Pool token counters
//!
//! Mirrors the external pool ledger. Every mutation returns the
//! `PoolInstruction` that the ledger must apply to stay in step.

use crate::domain::BondStatus;
use crate::error::{ValidatorSetError, ValidatorSetResult};
use serde::{Deserialize, Serialize};

/// Pool bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolBucket {
    Bonded,
    NotBonded,
}

impl PoolBucket {
    /// Bucket holding the tokens of a validator with this status.
    pub fn for_status(status: BondStatus) -> Self {
        match status {
            BondStatus::Bonded => PoolBucket::Bonded,
            BondStatus::Unbonding | BondStatus::Unbonded => PoolBucket::NotBonded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolBucket::Bonded => "bonded",
            PoolBucket::NotBonded => "not_bonded",
        }
    }
}

/// Token movement sent to the external pool ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolInstruction {
    Credit { bucket: PoolBucket, amount: u128 },
    Debit { bucket: PoolBucket, amount: u128 },
    Move {
        from: PoolBucket,
        to: PoolBucket,
        amount: u128,
    },
}

/// Aggregate token counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub bonded_tokens: u128,
    pub not_bonded_tokens: u128,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_tokens(&self) -> u128 {
        self.bonded_tokens.saturating_add(self.not_bonded_tokens)
    }

    fn bucket_mut(&mut self, bucket: PoolBucket) -> &mut u128 {
        match bucket {
            PoolBucket::Bonded => &mut self.bonded_tokens,
            PoolBucket::NotBonded => &mut self.not_bonded_tokens,
        }
    }

    /// Stake added to a validator in `bucket`.
    pub fn credit(&mut self, bucket: PoolBucket, amount: u128) -> PoolInstruction {
        let slot = self.bucket_mut(bucket);
        *slot = slot.saturating_add(amount);
        PoolInstruction::Credit { bucket, amount }
    }

    /// Stake removed from a validator in `bucket`.
    pub fn debit(&mut self, bucket: PoolBucket, amount: u128) -> ValidatorSetResult<PoolInstruction> {
        let slot = self.bucket_mut(bucket);
        *slot = slot
            .checked_sub(amount)
            .ok_or(ValidatorSetError::PoolUnderflow {
                bucket: bucket.as_str(),
                have: *slot,
                need: amount,
            })?;
        Ok(PoolInstruction::Debit { bucket, amount })
    }

    /// Move tokens between buckets on a status transition.
    pub fn transfer(
        &mut self,
        from: PoolBucket,
        to: PoolBucket,
        amount: u128,
    ) -> ValidatorSetResult<PoolInstruction> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(PoolInstruction::Move { from, to, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_between_buckets() {
        let mut pool = Pool::new();
        pool.credit(PoolBucket::NotBonded, 100);

        let instruction = pool
            .transfer(PoolBucket::NotBonded, PoolBucket::Bonded, 60)
            .unwrap();

        assert_eq!(pool.bonded_tokens, 60);
        assert_eq!(pool.not_bonded_tokens, 40);
        assert_eq!(pool.total_tokens(), 100);
        assert_eq!(
            instruction,
            PoolInstruction::Move {
                from: PoolBucket::NotBonded,
                to: PoolBucket::Bonded,
                amount: 60
            }
        );
    }

    #[test]
    fn test_underflow_is_fatal_and_leaves_pool_unchanged() {
        let mut pool = Pool::new();
        pool.credit(PoolBucket::Bonded, 5);

        let err = pool.debit(PoolBucket::Bonded, 6).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(pool.bonded_tokens, 5);
    }

    #[test]
    fn test_bucket_for_status() {
        assert_eq!(PoolBucket::for_status(BondStatus::Bonded), PoolBucket::Bonded);
        assert_eq!(
            PoolBucket::for_status(BondStatus::Unbonding),
            PoolBucket::NotBonded
        );
    }
}
