//! Validator Set Service - block lifecycle and transaction staging
//!
//! Queries read the committed snapshot. Mutating calls run against the open
//! block; the block becomes visible only when `end_block` commits it:
//!
//! ```text
//! begin_block ─→ [tx → validate → engine → dispatch]* ─→ check_invariants → commit
//!                       │ validation error: block untouched
//!                       │ fatal error: block discarded
//! ```

mod engine;
mod transitions;


pub use engine::{Engine, ReconcileMode};

use crate::domain::{
    BlockContext, BondStatus, CliffValidator, Outbox, Pool, StakingParams, Validator, ValidatorId,
    ValidatorSetState, ValidatorUpdate,
};
use crate::error::{ValidatorSetError, ValidatorSetResult};
use crate::events::ValidatorSetEvent;
use crate::metrics;
use crate::ports::inbound::{GenesisValidator, ReconcileOutcome, ValidatorSetApi};
use crate::ports::outbound::{EventSink, PoolLedger};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info, warn};

/// State and parameters that move together between blocks
#[derive(Clone, Debug, Default)]
struct Snapshot {
    state: ValidatorSetState,
    params: StakingParams,
}

/// Tentative state of the open block
struct PendingBlock {
    ctx: BlockContext,
    snapshot: Snapshot,
}

/// Validator Set Service implementation
pub struct ValidatorSetService<L, E>
where
    L: PoolLedger,
    E: EventSink,
{
    committed: RwLock<Snapshot>,
    pending: Mutex<Option<PendingBlock>>,
    ledger: Arc<L>,
    events: Arc<E>,
}

impl<L, E> ValidatorSetService<L, E>
where
    L: PoolLedger,
    E: EventSink,
{
    /// Create a service with an empty validator table.
    pub fn new(params: StakingParams, ledger: Arc<L>, events: Arc<E>) -> ValidatorSetResult<Self> {
        params.validate()?;
        info!(
            max_validators = params.max_validators,
            unbonding_time_secs = params.unbonding_time_secs,
            "validator set service created"
        );
        Ok(Self {
            committed: RwLock::new(Snapshot {
                state: ValidatorSetState::new(),
                params,
            }),
            pending: Mutex::new(None),
            ledger,
            events,
        })
    }

    /// Height of the open block, if any
    pub fn open_block(&self) -> Option<BlockContext> {
        self.pending.lock().as_ref().map(|block| block.ctx)
    }

    /// Run the full invariant check against committed state.
    pub fn check_invariants(&self) -> ValidatorSetResult<()> {
        let committed = self.committed.read();
        committed
            .state
            .check_invariants(committed.params.max_validators)
    }

    /// Run one transaction against the open block.
    ///
    /// Transactions mutate the pending state in place. Every rejection is
    /// raised before the first write, so a rejected transaction leaves the
    /// block as it was; anything that fails after a write is fatal and
    /// discards the block. The full invariant sweep runs here in debug
    /// builds and once per block in `end_block`.
    fn transact<T, F>(&self, op: &'static str, f: F) -> ValidatorSetResult<T>
    where
        F: FnOnce(&mut ValidatorSetState, &mut StakingParams, &BlockContext) -> ValidatorSetResult<T>,
    {
        let mut pending = self.pending.lock();
        let Some(block) = pending.as_mut() else {
            warn!(op, "rejected: no open block");
            metrics::record_rejected(ValidatorSetError::NoOpenBlock.kind());
            return Err(ValidatorSetError::NoOpenBlock);
        };

        let snapshot = &mut block.snapshot;
        let mut result = f(&mut snapshot.state, &mut snapshot.params, &block.ctx);
        if cfg!(debug_assertions) {
            result = result.and_then(|value| {
                snapshot
                    .state
                    .check_invariants(snapshot.params.max_validators)
                    .map(|()| value)
            });
        }
        let result = match result {
            Err(err) if !err.is_fatal() && !snapshot.state.outbox.is_empty() => {
                Err(ValidatorSetError::IndexInconsistent(format!(
                    "{op} rejected after writing state: {err}"
                )))
            }
            other => other,
        };

        match result {
            Ok(value) => {
                let outbox = std::mem::take(&mut snapshot.state.outbox);
                drop(pending);
                self.dispatch(outbox);
                Ok(value)
            }
            Err(err) if err.is_fatal() => {
                let height = block.ctx.height;
                *pending = None;
                error!(op, height, error = %err, "fatal invariant breach, block discarded");
                metrics::record_fatal(err.kind());
                Err(err)
            }
            Err(err) => {
                warn!(op, error = %err, "transaction rejected");
                metrics::record_rejected(err.kind());
                Err(err)
            }
        }
    }

    /// Deliver committed side effects to the outbound ports, in order.
    fn dispatch(&self, outbox: Outbox) {
        for instruction in outbox.pool_instructions {
            self.ledger.apply(instruction);
        }
        for event in outbox.events {
            self.events.publish(event);
        }
    }
}

impl<L, E> ValidatorSetApi for ValidatorSetService<L, E>
where
    L: PoolLedger,
    E: EventSink,
{
    fn begin_block(&self, ctx: BlockContext) -> ValidatorSetResult<()> {
        let mut pending = self.pending.lock();
        if let Some(open) = pending.as_ref() {
            return Err(ValidatorSetError::BlockAlreadyOpen {
                open: open.ctx.height,
                requested: ctx.height,
            });
        }

        let mut snapshot = self.committed.read().clone();
        snapshot.state.intra_tx_counter = 0;
        *pending = Some(PendingBlock { ctx, snapshot });
        Ok(())
    }

    fn apply_power_change(
        &self,
        id: ValidatorId,
        new_power: i64,
        jailed: bool,
    ) -> ValidatorSetResult<(Validator, bool)> {
        self.transact("apply_power_change", |state, params, ctx| {
            Engine::new(state, params, ctx).apply_power_change(id, new_power, jailed)
        })
    }

    fn reconcile_all(&self) -> ValidatorSetResult<ReconcileOutcome> {
        self.transact("reconcile_all", |state, params, ctx| {
            Engine::new(state, params, ctx).reconcile_all()
        })
    }

    fn jail(&self, id: ValidatorId) -> ValidatorSetResult<(Validator, bool)> {
        self.transact("jail", |state, params, ctx| {
            let power = state
                .validator(&id)
                .ok_or(ValidatorSetError::UnknownValidator(id))?
                .power;
            Engine::new(state, params, ctx).apply_power_change(id, power as i64, true)
        })
    }

    fn unjail(&self, id: ValidatorId) -> ValidatorSetResult<(Validator, bool)> {
        self.transact("unjail", |state, params, ctx| {
            let validator = state
                .validator(&id)
                .ok_or(ValidatorSetError::UnknownValidator(id))?;
            if !validator.jailed {
                return Err(ValidatorSetError::NotJailed(id));
            }
            let power = validator.power;
            Engine::new(state, params, ctx).apply_power_change(id, power as i64, false)
        })
    }

    fn complete_unbonding(&self, id: ValidatorId) -> ValidatorSetResult<Validator> {
        self.transact("complete_unbonding", |state, params, ctx| {
            Engine::new(state, params, ctx).complete_unbonding(&id)
        })
    }

    fn set_params(&self, new_params: StakingParams) -> ValidatorSetResult<Option<ReconcileOutcome>> {
        self.transact("set_params", |state, params, ctx| {
            new_params.validate()?;
            let resize = new_params.max_validators != params.max_validators;
            info!(
                old_max = params.max_validators,
                new_max = new_params.max_validators,
                "staking params updated"
            );
            *params = new_params;
            if resize {
                Engine::new(state, params, ctx).reconcile_all().map(Some)
            } else {
                Ok(None)
            }
        })
    }

    fn end_block(&self) -> ValidatorSetResult<Vec<ValidatorUpdate>> {
        let mut pending = self.pending.lock();
        let PendingBlock { ctx, mut snapshot } =
            pending.take().ok_or(ValidatorSetError::NoOpenBlock)?;

        if let Err(err) = snapshot
            .state
            .check_invariants(snapshot.params.max_validators)
        {
            error!(height = ctx.height, error = %err, "fatal invariant breach at block end, block discarded");
            metrics::record_fatal(err.kind());
            return Err(err);
        }

        let updates = snapshot.state.updates.drain();
        let bonded = snapshot.state.bonded_count();
        *self.committed.write() = snapshot;
        drop(pending);

        metrics::set_bonded_count(bonded);
        metrics::record_updates_flushed(updates.len());
        info!(
            height = ctx.height,
            updates = updates.len(),
            bonded,
            "block committed"
        );

        if !updates.is_empty() {
            self.events.publish(ValidatorSetEvent::ValidatorSetUpdated {
                height: ctx.height,
                updates: updates.clone(),
            });
        }
        Ok(updates)
    }

    fn discard_block(&self) {
        if let Some(block) = self.pending.lock().take() {
            warn!(height = block.ctx.height, "block discarded");
        }
    }

    fn init_genesis(
        &self,
        ctx: BlockContext,
        validators: Vec<GenesisValidator>,
    ) -> ValidatorSetResult<Vec<ValidatorUpdate>> {
        self.begin_block(ctx)?;
        let count = validators.len();
        let loaded = self.transact("init_genesis", |state, params, ctx| {
            Engine::new(state, params, ctx).load_genesis(&validators)
        });

        match loaded {
            Ok(outcome) => {
                info!(
                    validators = count,
                    bonded = outcome.promoted.len(),
                    "genesis loaded"
                );
                self.end_block()
            }
            Err(err) => {
                self.discard_block();
                Err(err)
            }
        }
    }

    fn validator(&self, id: &ValidatorId) -> Option<Validator> {
        self.committed.read().state.validator(id).cloned()
    }

    fn bonded_validators(&self) -> Vec<Validator> {
        self.committed
            .read()
            .state
            .bonded_in_rank_order()
            .into_iter()
            .cloned()
            .collect()
    }

    fn cliff(&self) -> Option<CliffValidator> {
        self.committed.read().state.cliff().get().copied()
    }

    fn pool(&self) -> Pool {
        *self.committed.read().state.pool()
    }

    fn params(&self) -> StakingParams {
        self.committed.read().params.clone()
    }

    fn matured_unbondings(&self, now: u64) -> Vec<ValidatorId> {
        self.committed
            .read()
            .state
            .validators()
            .filter(|v| v.status == BondStatus::Unbonding && v.unbonding_matured(now))
            .map(|v| v.id)
            .collect()
    }
}
