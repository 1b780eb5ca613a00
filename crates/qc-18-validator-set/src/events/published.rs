//! Published events (Outgoing)
//!
//! Lifecycle notifications for downstream modules (slashing, distribution,
//! query indexers). They are delivered after the owning transaction commits,
//! in the order the transitions happened.

use crate::domain::{Power, ValidatorId, ValidatorUpdate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorSetEvent {
    /// Validator entered the bonded set
    ValidatorBonded {
        id: ValidatorId,
        power: Power,
        height: u64,
    },
    /// Validator left the bonded set and started its unbonding period
    ValidatorBeginUnbonding {
        id: ValidatorId,
        height: u64,
        unbonding_min_time: u64,
    },
    /// Unbonding period elapsed
    ValidatorUnbonded { id: ValidatorId, height: u64 },
    ValidatorJailed { id: ValidatorId, height: u64 },
    ValidatorUnjailed { id: ValidatorId, height: u64 },
    /// End-of-block updates handed to the consensus engine
    ValidatorSetUpdated {
        height: u64,
        updates: Vec<ValidatorUpdate>,
    },
}

impl ValidatorSetEvent {
    /// Event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::ValidatorBonded { .. } => "validator_bonded",
            Self::ValidatorBeginUnbonding { .. } => "validator_begin_unbonding",
            Self::ValidatorUnbonded { .. } => "validator_unbonded",
            Self::ValidatorJailed { .. } => "validator_jailed",
            Self::ValidatorUnjailed { .. } => "validator_unjailed",
            Self::ValidatorSetUpdated { .. } => "validator_set_updated",
        }
    }
}
