//! Validator table and its derived views
//!
//! `ValidatorSetState` owns every collection the engine mutates. There is no
//! ambient store: each operation receives the state explicitly, and the
//! service stages a copy per transaction.

use crate::domain::{
    BondStatus, BondedIndex, CliffTracker, Pool, PoolBucket, PoolInstruction, PowerIndex,
    UpdateBuffer, Validator, ValidatorId,
};
use crate::error::{ValidatorSetError, ValidatorSetResult};
use crate::events::ValidatorSetEvent;
use std::collections::BTreeMap;

/// Side effects queued by a transaction, delivered to the outbound ports
/// once it commits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox {
    pub pool_instructions: Vec<PoolInstruction>,
    pub events: Vec<ValidatorSetEvent>,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.pool_instructions.is_empty() && self.events.is_empty()
    }
}

/// Complete engine state
#[derive(Clone, Debug, Default)]
pub struct ValidatorSetState {
    pub(crate) validators: BTreeMap<ValidatorId, Validator>,
    pub(crate) power_index: PowerIndex,
    pub(crate) bonded: BondedIndex,
    pub(crate) cliff: CliffTracker,
    pub(crate) updates: UpdateBuffer,
    pub(crate) pool: Pool,
    /// Next intra-block tie-break value, reset at every block start
    pub(crate) intra_tx_counter: u16,
    pub(crate) outbox: Outbox,
}

impl ValidatorSetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validator(&self, id: &ValidatorId) -> Option<&Validator> {
        self.validators.get(id)
    }

    pub fn validators(&self) -> impl Iterator<Item = &Validator> {
        self.validators.values()
    }

    pub fn power_index(&self) -> &PowerIndex {
        &self.power_index
    }

    pub fn bonded(&self) -> &BondedIndex {
        &self.bonded
    }

    pub fn cliff(&self) -> &CliffTracker {
        &self.cliff
    }

    pub fn updates(&self) -> &UpdateBuffer {
        &self.updates
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn bonded_count(&self) -> usize {
        self.bonded.len()
    }

    /// Bonded validators, highest rank first.
    pub fn bonded_in_rank_order(&self) -> Vec<&Validator> {
        self.power_index
            .iter()
            .filter(|(_, id)| self.bonded.contains(id))
            .filter_map(|(_, id)| self.validators.get(id))
            .collect()
    }

    /// Lookup that treats a missing record as an index breach.
    pub(crate) fn must_get(&self, id: &ValidatorId) -> ValidatorSetResult<&Validator> {
        self.validators.get(id).ok_or_else(|| {
            ValidatorSetError::IndexInconsistent(format!("validator {id} missing from table"))
        })
    }

    pub(crate) fn must_get_mut(&mut self, id: &ValidatorId) -> ValidatorSetResult<&mut Validator> {
        self.validators.get_mut(id).ok_or_else(|| {
            ValidatorSetError::IndexInconsistent(format!("validator {id} missing from table"))
        })
    }

    /// Hand out the next intra-block tie-break value.
    pub(crate) fn next_intra_tx_counter(&mut self) -> u16 {
        let counter = self.intra_tx_counter;
        self.intra_tx_counter = self.intra_tx_counter.saturating_add(1);
        counter
    }

    /// Reset the cliff from the current membership.
    ///
    /// Defined only when the set is exactly full.
    pub(crate) fn recompute_cliff(&mut self, max_validators: u16) {
        let lowest = if max_validators > 0 && self.bonded.len() == max_validators as usize {
            self.power_index
                .iter()
                .filter(|(_, id)| self.bonded.contains(id))
                .last()
                .map(|(rank, _)| *rank)
        } else {
            None
        };

        match lowest {
            Some(rank) => self.cliff.set(rank),
            None => self.cliff.clear(),
        }
    }

    /// Verify index agreement, the bonded bound, the cliff and pool totals.
    ///
    /// Returns the first breach found.
    pub fn check_invariants(&self, max_validators: u16) -> ValidatorSetResult<()> {
        let mut bonded_count = 0usize;
        let mut bonded_tokens = 0u128;
        let mut not_bonded_tokens = 0u128;

        if !self.power_index.is_consistent() || self.power_index.len() != self.validators.len() {
            return Err(ValidatorSetError::IndexInconsistent(format!(
                "power index holds {} entries for {} validators",
                self.power_index.len(),
                self.validators.len()
            )));
        }

        for validator in self.validators.values() {
            if self.power_index.rank_of(&validator.id) != Some(&validator.rank()) {
                return Err(ValidatorSetError::IndexInconsistent(format!(
                    "stale power index key for {}",
                    validator.id
                )));
            }

            let is_bonded = validator.status == BondStatus::Bonded;
            if is_bonded && validator.jailed {
                return Err(ValidatorSetError::JailedValidatorBonded(validator.id));
            }
            if is_bonded != self.bonded.contains(&validator.id) {
                return Err(ValidatorSetError::IndexInconsistent(format!(
                    "bonded index disagrees with status of {}",
                    validator.id
                )));
            }

            match PoolBucket::for_status(validator.status) {
                PoolBucket::Bonded => {
                    bonded_count += 1;
                    bonded_tokens = bonded_tokens.saturating_add(validator.tokens);
                }
                PoolBucket::NotBonded => {
                    not_bonded_tokens = not_bonded_tokens.saturating_add(validator.tokens);
                }
            }
        }

        if bonded_count != self.bonded.len() {
            return Err(ValidatorSetError::IndexInconsistent(format!(
                "bonded index holds unknown members ({} vs {})",
                self.bonded.len(),
                bonded_count
            )));
        }

        if bonded_count > max_validators as usize {
            return Err(ValidatorSetError::BoundExceeded {
                bonded: bonded_count,
                max: max_validators,
            });
        }

        let full = max_validators > 0 && bonded_count == max_validators as usize;
        if full != self.cliff.is_defined() {
            return Err(ValidatorSetError::CliffMismatch {
                bonded: bonded_count,
                max: max_validators,
                cliff_defined: self.cliff.is_defined(),
            });
        }
        if let Some(cliff) = self.cliff.get() {
            let lowest = self.bonded_in_rank_order().last().map(|v| v.rank());
            if lowest != Some(cliff.rank) {
                return Err(ValidatorSetError::IndexInconsistent(format!(
                    "cliff {} is not the lowest bonded validator",
                    cliff.id
                )));
            }
        }

        if self.pool.bonded_tokens != bonded_tokens
            || self.pool.not_bonded_tokens != not_bonded_tokens
        {
            return Err(ValidatorSetError::IndexInconsistent(format!(
                "pool {}/{} disagrees with validator tokens {}/{}",
                self.pool.bonded_tokens,
                self.pool.not_bonded_tokens,
                bonded_tokens,
                not_bonded_tokens
            )));
        }

        Ok(())
    }
}
