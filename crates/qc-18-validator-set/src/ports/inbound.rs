//! Driving Ports (API - Inbound)
//!
//! Called by the staking module's transaction handlers (delegate,
//! undelegate, jail, unjail, parameter change) and by the block executor
//! (begin/end block). Queries read committed state only.

use crate::domain::{
    BlockContext, CliffValidator, Pool, Power, StakingParams, Validator, ValidatorId,
    ValidatorUpdate,
};
use crate::error::ValidatorSetResult;
use serde::{Deserialize, Serialize};

/// Membership changes made by one reconciliation pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Newly bonded, in id order
    pub promoted: Vec<ValidatorId>,
    /// Moved to unbonding, in id order
    pub demoted: Vec<ValidatorId>,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.promoted.is_empty() && self.demoted.is_empty()
    }
}

/// Validator entry of the genesis document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisValidator {
    pub id: ValidatorId,
    pub power: Power,
    #[serde(default)]
    pub jailed: bool,
}

/// Primary Validator Set API
pub trait ValidatorSetApi: Send + Sync {
    /// Open a block. Tentative state is invisible to queries until
    /// `end_block`.
    fn begin_block(&self, ctx: BlockContext) -> ValidatorSetResult<()>;

    /// Report a validator's new power and jail flag.
    ///
    /// Returns the final record and whether its bonding status changed.
    fn apply_power_change(
        &self,
        id: ValidatorId,
        new_power: i64,
        jailed: bool,
    ) -> ValidatorSetResult<(Validator, bool)>;

    /// Recompute the whole bonded set from the power index.
    fn reconcile_all(&self) -> ValidatorSetResult<ReconcileOutcome>;

    /// Jail a validator at its current power.
    fn jail(&self, id: ValidatorId) -> ValidatorSetResult<(Validator, bool)>;

    /// Lift a jail. The validator competes for admission again.
    fn unjail(&self, id: ValidatorId) -> ValidatorSetResult<(Validator, bool)>;

    /// Finish a matured unbonding (driven by the external unbonding timer).
    fn complete_unbonding(&self, id: ValidatorId) -> ValidatorSetResult<Validator>;

    /// Replace parameters. A changed `max_validators` triggers a full
    /// reconciliation in the same transaction.
    fn set_params(&self, params: StakingParams) -> ValidatorSetResult<Option<ReconcileOutcome>>;

    /// Drain the per-block updates and commit the block.
    fn end_block(&self) -> ValidatorSetResult<Vec<ValidatorUpdate>>;

    /// Drop the open block's tentative state.
    fn discard_block(&self);

    /// Load the genesis validator set and return the initial updates.
    fn init_genesis(
        &self,
        ctx: BlockContext,
        validators: Vec<GenesisValidator>,
    ) -> ValidatorSetResult<Vec<ValidatorUpdate>>;

    // === QUERIES (committed state) ===

    fn validator(&self, id: &ValidatorId) -> Option<Validator>;

    /// Bonded validators, highest rank first
    fn bonded_validators(&self) -> Vec<Validator>;

    fn cliff(&self) -> Option<CliffValidator>;

    fn pool(&self) -> Pool;

    fn params(&self) -> StakingParams;

    /// Unbonding validators whose period has elapsed at `now`
    fn matured_unbondings(&self, now: u64) -> Vec<ValidatorId>;
}
