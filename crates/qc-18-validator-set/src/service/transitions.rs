//! Status transitions with their side effects
//!
//! Every transition funnels through here so the validator record, the
//! bonded index, the pool mirror, the update buffer and the outbox move
//! together.

use super::engine::Engine;
use crate::domain::{PoolBucket, Validator, ValidatorId};
use crate::error::{ValidatorSetError, ValidatorSetResult};
use crate::events::ValidatorSetEvent;
use crate::metrics;
use tracing::info;

impl Engine<'_> {
    /// Unbonded/Unbonding → Bonded
    pub(crate) fn bond_validator(&mut self, id: &ValidatorId) -> ValidatorSetResult<()> {
        let height = self.ctx.height;
        let validator = self.state.must_get_mut(id)?;
        validator.bond()?;
        let (power, tokens) = (validator.power, validator.tokens);

        let instruction = self
            .state
            .pool
            .transfer(PoolBucket::NotBonded, PoolBucket::Bonded, tokens)?;
        self.state.outbox.pool_instructions.push(instruction);

        if !self.state.bonded.insert(*id) {
            return Err(ValidatorSetError::IndexInconsistent(format!(
                "{id} already in bonded index"
            )));
        }
        self.state.updates.record(*id, power);
        self.state
            .outbox
            .events
            .push(ValidatorSetEvent::ValidatorBonded {
                id: *id,
                power,
                height,
            });

        metrics::record_promotion();
        info!(validator = %id, power, height, "validator bonded");
        Ok(())
    }

    /// Bonded → Unbonding
    ///
    /// Reports zero power so the consensus engine drops the validator.
    pub(crate) fn begin_unbonding(&mut self, id: &ValidatorId) -> ValidatorSetResult<()> {
        let ctx = *self.ctx;
        let unbonding_time = self.params.unbonding_time_secs;
        let validator = self.state.must_get_mut(id)?;
        validator.begin_unbonding(&ctx, unbonding_time)?;
        let tokens = validator.tokens;
        let unbonding_min_time = validator.unbonding_min_time.unwrap_or(ctx.time);

        let instruction = self
            .state
            .pool
            .transfer(PoolBucket::Bonded, PoolBucket::NotBonded, tokens)?;
        self.state.outbox.pool_instructions.push(instruction);

        if !self.state.bonded.remove(id) {
            return Err(ValidatorSetError::IndexInconsistent(format!(
                "{id} missing from bonded index"
            )));
        }
        self.state.updates.record(*id, 0);
        self.state
            .outbox
            .events
            .push(ValidatorSetEvent::ValidatorBeginUnbonding {
                id: *id,
                height: ctx.height,
                unbonding_min_time,
            });

        metrics::record_demotion();
        info!(
            validator = %id,
            height = ctx.height,
            unbonding_min_time,
            "validator begin unbonding"
        );
        Ok(())
    }

    /// Unbonding → Unbonded
    ///
    /// Externally driven, so a missing record is a rejected transaction.
    pub(crate) fn complete_unbonding(&mut self, id: &ValidatorId) -> ValidatorSetResult<Validator> {
        let ctx = *self.ctx;
        let validator = self
            .state
            .validators
            .get_mut(id)
            .ok_or(ValidatorSetError::UnknownValidator(*id))?;
        validator.complete_unbonding(ctx.time)?;
        let completed = validator.clone();

        self.state
            .outbox
            .events
            .push(ValidatorSetEvent::ValidatorUnbonded {
                id: *id,
                height: ctx.height,
            });

        info!(validator = %id, height = ctx.height, "validator unbonded");
        Ok(completed)
    }
}
