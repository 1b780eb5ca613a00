//! Update Engine
//!
//! Two entry points share one admission primitive:
//!
//! ```text
//! apply_power_change ──(may affect membership)──→ reconcile(Single(id))
//!                                                        │
//! reconcile_all ─────────────────────────────────→ reconcile(Full)
//!                                                        │
//!                         scan power index, top max_validators eligible
//!                                                        │
//!                         demote (prev \ admitted), promote (admitted \ prev)
//!                                                        │
//!                         cliff = last admitted if full, else cleared
//! ```
//!
//! Single mode additionally enforces the incremental contract: a full set
//! swaps at most one validator per power change.

use crate::domain::{
    BlockContext, BondStatus, Power, PoolBucket, PowerRank, StakingParams, Validator, ValidatorId,
    ValidatorSetState, MAX_VOTING_POWER,
};
use crate::error::{ValidatorSetError, ValidatorSetResult};
use crate::events::ValidatorSetEvent;
use crate::ports::{GenesisValidator, ReconcileOutcome};
use std::collections::BTreeSet;
use tracing::debug;

/// Scope of a reconciliation pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Full rescan (genesis, parameter change, explicit request)
    Full,
    /// Triggered by a power change of one validator
    Single(ValidatorId),
}

/// Engine bound to one state, parameter set and block for the duration of a
/// transaction.
pub struct Engine<'a> {
    pub(crate) state: &'a mut ValidatorSetState,
    pub(crate) params: &'a StakingParams,
    pub(crate) ctx: &'a BlockContext,
}

impl<'a> Engine<'a> {
    pub fn new(
        state: &'a mut ValidatorSetState,
        params: &'a StakingParams,
        ctx: &'a BlockContext,
    ) -> Self {
        Self { state, params, ctx }
    }

    /// Incremental path.
    ///
    /// Returns the final record and whether its bonding status changed.
    pub fn apply_power_change(
        &mut self,
        id: ValidatorId,
        new_power: i64,
        jailed: bool,
    ) -> ValidatorSetResult<(Validator, bool)> {
        let new_power = validate_power(id, new_power)?;

        let old = self.state.validators.get(&id).cloned();
        let old_status = old.as_ref().map_or(BondStatus::Unbonded, |v| v.status);
        let old_power = old.as_ref().map_or(0, |v| v.power);
        let was_jailed = old.as_ref().is_some_and(|v| v.jailed);
        if old.is_none() {
            self.state.validators.insert(id, Validator::new(id));
        }

        // 1. Jailing opens a slot immediately; the cliff is rebuilt lazily
        //    by the next admission or full pass.
        if jailed && !was_jailed {
            if old_status == BondStatus::Bonded {
                self.begin_unbonding(&id)?;
                self.state.cliff.clear();
            }
            self.push_event(ValidatorSetEvent::ValidatorJailed {
                id,
                height: self.ctx.height,
            });
        } else if !jailed && was_jailed {
            self.push_event(ValidatorSetEvent::ValidatorUnjailed {
                id,
                height: self.ctx.height,
            });
        }

        // 2. New power, tokens, tie-break and index key
        let rank = self.update_record(&id, new_power, jailed)?;

        // 3. Admission decision
        let status = self.state.must_get(&id)?.status;
        let cliff = self.state.cliff.get().copied();

        if status == BondStatus::Bonded {
            if new_power > old_power {
                self.state.updates.record(id, new_power);
                if self.state.cliff.is(&id) {
                    self.state.recompute_cliff(self.params.max_validators);
                }
                debug!(validator = %id, old_power, new_power, "bonded power increased");
            } else if new_power < old_power {
                let may_leave = new_power == 0
                    || cliff.is_some_and(|c| c.id == id || !rank.outranks(&c.rank));
                if may_leave {
                    self.reconcile(ReconcileMode::Single(id))?;
                }
                if self.state.bonded.contains(&id) {
                    self.state.updates.record(id, new_power);
                }
                debug!(
                    validator = %id,
                    old_power,
                    new_power,
                    reconciled = may_leave,
                    "bonded power decreased"
                );
            }
        } else {
            let eligible = !jailed && new_power > 0;
            let below_cliff = cliff.is_some_and(|c| new_power < c.power());
            if eligible && !below_cliff {
                self.reconcile(ReconcileMode::Single(id))?;
            } else {
                debug!(
                    validator = %id,
                    new_power,
                    jailed,
                    cliff_power = cliff.map(|c| c.power()),
                    "candidate not admitted"
                );
            }
        }

        let validator = self.state.must_get(&id)?.clone();
        let changed = validator.status != old_status;
        Ok((validator, changed))
    }

    /// Full path.
    pub fn reconcile_all(&mut self) -> ValidatorSetResult<ReconcileOutcome> {
        self.reconcile(ReconcileMode::Full)
    }

    /// Load a genesis set and bond its top validators.
    ///
    /// Every entry is checked before the first record is written.
    pub fn load_genesis(
        &mut self,
        validators: &[GenesisValidator],
    ) -> ValidatorSetResult<ReconcileOutcome> {
        let mut seen = BTreeSet::new();
        for genesis in validators {
            if !seen.insert(genesis.id) || self.state.validators.contains_key(&genesis.id) {
                return Err(ValidatorSetError::DuplicateGenesisValidator(genesis.id));
            }
            validate_genesis_power(genesis.id, genesis.power)?;
        }

        for genesis in validators {
            self.load_validator(genesis.id, genesis.power, genesis.jailed)?;
        }
        self.reconcile_all()
    }

    /// Insert a genesis record without running admission.
    pub fn load_validator(
        &mut self,
        id: ValidatorId,
        power: Power,
        jailed: bool,
    ) -> ValidatorSetResult<()> {
        if self.state.validators.contains_key(&id) {
            return Err(ValidatorSetError::DuplicateGenesisValidator(id));
        }
        let power = validate_genesis_power(id, power)?;
        self.state.validators.insert(id, Validator::new(id));
        self.update_record(&id, power, jailed)?;
        Ok(())
    }

    /// Shared admission primitive.
    pub fn reconcile(&mut self, mode: ReconcileMode) -> ValidatorSetResult<ReconcileOutcome> {
        let max = self.params.max_validators;
        let was_full = max > 0 && self.state.bonded.len() == max as usize;

        if matches!(mode, ReconcileMode::Single(_)) && was_full != self.state.cliff.is_defined() {
            return Err(ValidatorSetError::CliffMismatch {
                bonded: self.state.bonded.len(),
                max,
                cliff_defined: self.state.cliff.is_defined(),
            });
        }

        let previous = self.state.bonded.snapshot();
        let admitted = self.scan_admissible()?;
        let admitted_ids: BTreeSet<ValidatorId> = admitted.iter().map(|r| r.id).collect();

        let outcome = ReconcileOutcome {
            promoted: admitted_ids.difference(&previous).copied().collect(),
            demoted: previous.difference(&admitted_ids).copied().collect(),
        };

        if let ReconcileMode::Single(affected) = mode {
            if was_full {
                check_single_swap(affected, &outcome)?;
            }
        }

        // Demote first so the bonded set never exceeds the bound mid-pass
        for id in &outcome.demoted {
            self.begin_unbonding(id)?;
        }
        for id in &outcome.promoted {
            self.bond_validator(id)?;
        }

        match admitted.last() {
            Some(lowest) if admitted.len() == max as usize => self.state.cliff.set(*lowest),
            _ => self.state.cliff.clear(),
        }

        if self.state.bonded.len() > max as usize {
            return Err(ValidatorSetError::BoundExceeded {
                bonded: self.state.bonded.len(),
                max,
            });
        }

        debug!(
            ?mode,
            promoted = outcome.promoted.len(),
            demoted = outcome.demoted.len(),
            bonded = self.state.bonded.len(),
            cliff = ?self.state.cliff.get().map(|c| c.id),
            "reconciled bonded set"
        );
        Ok(outcome)
    }

    /// Top `max_validators` eligible ranks, highest first.
    ///
    /// Jailed and zero-power validators rank below every eligible one, so the
    /// first of them ends the scan.
    fn scan_admissible(&self) -> ValidatorSetResult<Vec<PowerRank>> {
        let max = self.params.max_validators as usize;
        let mut admitted = Vec::with_capacity(max);

        for (rank, id) in self.state.power_index.iter() {
            if admitted.len() >= max {
                break;
            }
            let validator = self.state.must_get(id)?;
            if validator.jailed {
                if validator.is_bonded() {
                    return Err(ValidatorSetError::JailedValidatorBonded(*id));
                }
                break;
            }
            if validator.power == 0 {
                break;
            }
            admitted.push(*rank);
        }

        Ok(admitted)
    }

    /// Write power, tokens, jail flag and tie-break; settle the pool delta;
    /// re-key the power index. Returns the new rank.
    fn update_record(
        &mut self,
        id: &ValidatorId,
        new_power: Power,
        jailed: bool,
    ) -> ValidatorSetResult<PowerRank> {
        let height = self.ctx.height;
        let new_tokens = self.params.tokens_for(new_power);
        let bonded = self.state.must_get(id)?.is_bonded();
        // Candidates outside the bonded set start a new bonding episode
        let tie_break = if bonded {
            None
        } else {
            Some(self.state.next_intra_tx_counter())
        };

        let validator = self.state.must_get_mut(id)?;
        let old_tokens = validator.tokens;
        let bucket = PoolBucket::for_status(validator.status);
        validator.power = new_power;
        validator.tokens = new_tokens;
        validator.jailed = jailed;
        if let Some(counter) = tie_break {
            validator.bond_height = height;
            validator.bond_intra_tx_counter = counter;
        }
        let rank = validator.rank();

        if new_tokens > old_tokens {
            let instruction = self.state.pool.credit(bucket, new_tokens - old_tokens);
            self.state.outbox.pool_instructions.push(instruction);
        } else if new_tokens < old_tokens {
            let instruction = self.state.pool.debit(bucket, old_tokens - new_tokens)?;
            self.state.outbox.pool_instructions.push(instruction);
        }

        self.state.power_index.insert(rank);
        Ok(rank)
    }

    fn push_event(&mut self, event: ValidatorSetEvent) {
        self.state.outbox.events.push(event);
    }
}

fn validate_power(id: ValidatorId, power: i64) -> ValidatorSetResult<Power> {
    if power < 0 {
        return Err(ValidatorSetError::NegativePower { id, power });
    }
    let power = power as Power;
    if power > MAX_VOTING_POWER {
        return Err(ValidatorSetError::PowerOverflow {
            id,
            power: power as i64,
            max: MAX_VOTING_POWER,
        });
    }
    Ok(power)
}

fn validate_genesis_power(id: ValidatorId, power: Power) -> ValidatorSetResult<Power> {
    validate_power(id, i64::try_from(power).unwrap_or(i64::MAX))
}

/// A full set changes by at most one validator per power change: either a
/// one-for-one swap involving the affected validator, or the affected
/// validator leaving with no eligible replacement.
fn check_single_swap(affected: ValidatorId, outcome: &ReconcileOutcome) -> ValidatorSetResult<()> {
    let promoted = outcome.promoted.len();
    let demoted = outcome.demoted.len();
    let involves_affected =
        outcome.promoted.contains(&affected) || outcome.demoted.contains(&affected);

    let unchanged = promoted == 0 && demoted == 0;
    let swap = promoted == 1 && demoted == 1 && involves_affected;
    let vacated = promoted == 0 && outcome.demoted == [affected];

    if !(unchanged || swap || vacated) {
        return Err(ValidatorSetError::MultiplePromotions {
            affected,
            promoted,
            demoted,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BondStatus;

    fn id(n: u8) -> ValidatorId {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        ValidatorId(bytes)
    }

    struct Fixture {
        state: ValidatorSetState,
        params: StakingParams,
        ctx: BlockContext,
    }

    impl Fixture {
        fn new(max_validators: u16) -> Self {
            Self {
                state: ValidatorSetState::new(),
                params: StakingParams::default()
                    .with_max_validators(max_validators)
                    .with_unbonding_time_secs(100),
                ctx: BlockContext::new(1, 1_000),
            }
        }

        fn engine(&mut self) -> Engine<'_> {
            Engine::new(&mut self.state, &self.params, &self.ctx)
        }

        fn apply(&mut self, n: u8, power: i64) -> (Validator, bool) {
            self.engine().apply_power_change(id(n), power, false).unwrap()
        }

        fn status(&self, n: u8) -> BondStatus {
            self.state.validator(&id(n)).unwrap().status
        }

        fn bonded_ids(&self) -> Vec<ValidatorId> {
            self.state.bonded().iter().copied().collect()
        }

        fn assert_consistent(&self) {
            self.state
                .check_invariants(self.params.max_validators)
                .unwrap();
        }
    }

    #[test]
    fn test_spare_capacity_admits_any_candidate() {
        let mut f = Fixture::new(3);
        let (v, changed) = f.apply(1, 5);

        assert!(changed);
        assert_eq!(v.status, BondStatus::Bonded);
        assert!(!f.state.cliff().is_defined());
        assert_eq!(f.state.updates().get(&id(1)), Some(5));
        f.assert_consistent();
    }

    #[test]
    fn test_filling_the_set_defines_cliff() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);

        assert!(f.state.cliff().is(&id(2)));
        assert_eq!(f.state.cliff().power(), Some(8));
        f.assert_consistent();
    }

    #[test]
    fn test_higher_entrant_evicts_cliff() {
        let mut f = Fixture::new(2);
        f.apply(1, 10); // X
        f.apply(2, 8); // Y
        let (z, changed) = f.apply(3, 9); // Z

        assert!(changed);
        assert_eq!(z.status, BondStatus::Bonded);
        assert_eq!(f.status(2), BondStatus::Unbonding);
        assert_eq!(
            f.state.validator(&id(2)).unwrap().unbonding_min_time,
            Some(1_100)
        );
        assert!(f.state.cliff().is(&id(3)));
        assert_eq!(f.state.cliff().power(), Some(9));
        assert_eq!(f.state.updates().get(&id(2)), Some(0));
        assert_eq!(f.state.updates().get(&id(3)), Some(9));
        f.assert_consistent();
    }

    #[test]
    fn test_candidate_below_cliff_is_ignored() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        let (v, changed) = f.apply(3, 7);

        assert!(!changed);
        assert_eq!(v.status, BondStatus::Unbonded);
        assert_eq!(f.state.updates().get(&id(3)), None);
        assert!(f.state.cliff().is(&id(2)));
        f.assert_consistent();
    }

    #[test]
    fn test_equal_power_candidate_loses_tie_break() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        // Same power, later intra-block counter
        let (v, changed) = f.apply(3, 8);

        assert!(!changed);
        assert_eq!(v.status, BondStatus::Unbonded);
        assert!(f.state.cliff().is(&id(2)));
        f.assert_consistent();
    }

    #[test]
    fn test_cliff_power_increase_recomputes_cliff() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        let (_, changed) = f.apply(2, 12);

        assert!(!changed);
        assert!(f.state.cliff().is(&id(1)));
        assert_eq!(f.state.updates().get(&id(2)), Some(12));
        f.assert_consistent();
    }

    #[test]
    fn test_bonded_decrease_below_cliff_demotes_and_promotes() {
        let mut f = Fixture::new(3);
        f.apply(1, 20); // A
        f.apply(2, 12); // B
        f.apply(3, 8); // C, cliff
        f.apply(4, 6); // D, waiting

        let (a, changed) = f.apply(1, 5);

        assert!(changed);
        assert_eq!(a.status, BondStatus::Unbonding);
        assert_eq!(f.status(4), BondStatus::Bonded);
        assert!(f.state.cliff().is(&id(4)));
        assert_eq!(f.state.updates().get(&id(1)), Some(0));
        f.assert_consistent();
    }

    #[test]
    fn test_bonded_decrease_without_challenger_moves_cliff() {
        let mut f = Fixture::new(3);
        f.apply(1, 20);
        f.apply(2, 12);
        f.apply(3, 8);

        let (a, changed) = f.apply(1, 5);

        assert!(!changed);
        assert_eq!(a.status, BondStatus::Bonded);
        assert!(f.state.cliff().is(&id(1)));
        assert_eq!(f.state.updates().get(&id(1)), Some(5));
        f.assert_consistent();
    }

    #[test]
    fn test_bonded_decrease_above_cliff_updates_power_only() {
        let mut f = Fixture::new(2);
        f.apply(1, 20);
        f.apply(2, 8);
        f.apply(3, 4);

        let (_, changed) = f.apply(1, 10);
        assert!(!changed);
        assert_eq!(f.state.updates().get(&id(1)), Some(10));
        assert!(f.state.cliff().is(&id(2)));
        f.assert_consistent();
    }

    #[test]
    fn test_zero_power_leaves_bonded_set() {
        let mut f = Fixture::new(5);
        f.apply(1, 20);
        let (v, changed) = f.apply(1, 0);

        assert!(changed);
        assert_eq!(v.status, BondStatus::Unbonding);
        assert_eq!(f.state.updates().get(&id(1)), Some(0));
        f.assert_consistent();
    }

    #[test]
    fn test_zero_power_in_full_set_without_candidate() {
        for leaver in [1, 2] {
            let mut f = Fixture::new(2);
            f.apply(1, 10);
            f.apply(2, 8);
            assert!(f.state.cliff().is(&id(2)));

            let (v, changed) = f.apply(leaver, 0);

            assert!(changed);
            assert_eq!(v.status, BondStatus::Unbonding);
            assert_eq!(f.state.bonded_count(), 1);
            assert!(!f.state.bonded().contains(&id(leaver)));
            assert!(!f.state.cliff().is_defined());
            assert_eq!(f.state.updates().get(&id(leaver)), Some(0));
            f.assert_consistent();
        }
    }

    #[test]
    fn test_zero_power_in_full_set_promotes_waiting_candidate() {
        for leaver in [1, 2] {
            let mut f = Fixture::new(2);
            f.apply(1, 10);
            f.apply(2, 8);
            f.apply(3, 5);
            assert_eq!(f.status(3), BondStatus::Unbonded);

            let (v, changed) = f.apply(leaver, 0);

            assert!(changed);
            assert_eq!(v.status, BondStatus::Unbonding);
            assert_eq!(f.status(3), BondStatus::Bonded);
            assert_eq!(f.state.bonded_count(), 2);
            assert!(f.state.cliff().is(&id(3)));
            assert_eq!(f.state.updates().get(&id(leaver)), Some(0));
            assert_eq!(f.state.updates().get(&id(3)), Some(5));
            f.assert_consistent();
        }
    }

    #[test]
    fn test_jailing_bonded_frees_slot_and_clears_cliff() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        f.apply(3, 5);

        let (v, changed) = f.engine().apply_power_change(id(1), 10, true).unwrap();

        assert!(changed);
        assert!(v.jailed);
        assert_eq!(v.status, BondStatus::Unbonding);
        assert!(!f.state.cliff().is_defined());
        // The freed slot is filled lazily
        assert_eq!(f.status(3), BondStatus::Unbonded);
        f.assert_consistent();

        let outcome = f.engine().reconcile_all().unwrap();
        assert_eq!(outcome.promoted, vec![id(3)]);
        assert!(outcome.demoted.is_empty());
        assert!(f.state.cliff().is(&id(3)));
        f.assert_consistent();
    }

    #[test]
    fn test_jailed_candidate_never_admitted() {
        let mut f = Fixture::new(3);
        let (v, changed) = f.engine().apply_power_change(id(1), 100, true).unwrap();

        assert!(!changed);
        assert_eq!(v.status, BondStatus::Unbonded);
        assert!(f.engine().reconcile_all().unwrap().is_empty());
        f.assert_consistent();
    }

    #[test]
    fn test_unjail_readmits() {
        let mut f = Fixture::new(3);
        f.engine().apply_power_change(id(1), 100, true).unwrap();
        let (v, changed) = f.engine().apply_power_change(id(1), 100, false).unwrap();

        assert!(changed);
        assert_eq!(v.status, BondStatus::Bonded);
        f.assert_consistent();
    }

    #[test]
    fn test_full_reconcile_after_shrink() {
        let mut f = Fixture::new(4);
        for (n, power) in [(1, 40), (2, 30), (3, 20), (4, 10)] {
            f.apply(n, power);
        }
        f.params.max_validators = 2;

        let outcome = f.engine().reconcile_all().unwrap();
        assert!(outcome.promoted.is_empty());
        assert_eq!(outcome.demoted, vec![id(3), id(4)]);
        assert_eq!(f.bonded_ids(), vec![id(1), id(2)]);
        assert!(f.state.cliff().is(&id(2)));
        f.assert_consistent();
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        f.apply(3, 6);

        f.engine().reconcile_all().unwrap();
        let buffered = f.state.updates().clone();
        let second = f.engine().reconcile_all().unwrap();

        assert!(second.is_empty());
        assert_eq!(f.state.updates(), &buffered);
        f.assert_consistent();
    }

    #[test]
    fn test_zero_max_validators_bonds_nothing() {
        let mut f = Fixture::new(0);
        let (v, changed) = f.apply(1, 100);

        assert!(!changed);
        assert_eq!(v.status, BondStatus::Unbonded);
        assert!(!f.state.cliff().is_defined());
        f.assert_consistent();
    }

    #[test]
    fn test_negative_and_overflowing_power_rejected() {
        let mut f = Fixture::new(2);
        let err = f.engine().apply_power_change(id(1), -5, false).unwrap_err();
        assert!(matches!(err, ValidatorSetError::NegativePower { power: -5, .. }));
        assert!(!err.is_fatal());

        let err = f
            .engine()
            .apply_power_change(id(1), i64::MAX, false)
            .unwrap_err();
        assert!(matches!(err, ValidatorSetError::PowerOverflow { .. }));
        assert!(f.state.validator(&id(1)).is_none());
    }

    #[test]
    fn test_stale_cliff_is_fatal_on_incremental_path() {
        let mut f = Fixture::new(2);
        f.apply(1, 10);
        f.apply(2, 8);
        f.state.cliff.clear();

        let err = f.engine().apply_power_change(id(3), 9, false).unwrap_err();
        assert!(matches!(err, ValidatorSetError::CliffMismatch { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_single_swap_contract() {
        let affected = id(1);
        let ok = ReconcileOutcome {
            promoted: vec![affected],
            demoted: vec![id(2)],
        };
        assert!(check_single_swap(affected, &ok).is_ok());

        let two = ReconcileOutcome {
            promoted: vec![id(3), id(4)],
            demoted: vec![id(5), id(6)],
        };
        assert!(check_single_swap(affected, &two).is_err());

        let unrelated = ReconcileOutcome {
            promoted: vec![id(3)],
            demoted: vec![id(4)],
        };
        assert!(check_single_swap(affected, &unrelated).is_err());

        let vacated = ReconcileOutcome {
            promoted: vec![],
            demoted: vec![affected],
        };
        assert!(check_single_swap(affected, &vacated).is_ok());

        let other_vacated = ReconcileOutcome {
            promoted: vec![],
            demoted: vec![id(2)],
        };
        assert!(check_single_swap(affected, &other_vacated).is_err());

        assert!(check_single_swap(affected, &ReconcileOutcome::default()).is_ok());
    }

    #[test]
    fn test_pool_tracks_transitions() {
        let mut f = Fixture::new(1);
        f.params.tokens_per_power = 10;
        f.apply(1, 5);
        f.apply(2, 7);

        assert_eq!(f.state.pool().bonded_tokens, 70);
        assert_eq!(f.state.pool().not_bonded_tokens, 50);
        f.assert_consistent();
    }

    #[test]
    fn test_load_validator_rejects_duplicates() {
        let mut f = Fixture::new(2);
        f.engine().load_validator(id(1), 10, false).unwrap();
        let err = f.engine().load_validator(id(1), 10, false).unwrap_err();
        assert_eq!(err, ValidatorSetError::DuplicateGenesisValidator(id(1)));
    }

    #[test]
    fn test_load_genesis_validates_before_writing() {
        let genesis = |n: u8| GenesisValidator {
            id: id(n),
            power: 10,
            jailed: false,
        };
        let mut f = Fixture::new(2);

        let err = f
            .engine()
            .load_genesis(&[genesis(1), genesis(2), genesis(1)])
            .unwrap_err();
        assert_eq!(err, ValidatorSetError::DuplicateGenesisValidator(id(1)));
        assert_eq!(f.state.validators().count(), 0);
        assert!(f.state.outbox.is_empty());

        let outcome = f.engine().load_genesis(&[genesis(1), genesis(2)]).unwrap();
        assert_eq!(outcome.promoted, vec![id(1), id(2)]);
        f.assert_consistent();
    }
}
