//! Error types for the Validator Set subsystem
//!
//! Two tiers share one enum:
//! - **Fatal** invariant breaches. The engine cannot reach them through its
//!   own logic; the enclosing block is discarded.
//! - **Rejected** transactions (input validation). Only the offending
//!   transaction is dropped.
//!
//! Capacity edge cases (no cliff, zero `max_validators`, empty set) are not
//! errors.

use crate::domain::{BondStatus, Power, ValidatorId};
use thiserror::Error;

/// Validator set errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorSetError {
    // === FATAL INVARIANT BREACHES ===
    /// Bond transition on a validator that is already bonded
    #[error("Fatal: validator {0} is already bonded")]
    AlreadyBonded(ValidatorId),

    /// Bond transition on a jailed validator
    #[error("Fatal: jailed validator {0} cannot be bonded")]
    BondJailed(ValidatorId),

    /// Unbond transition on a validator that is not bonded
    #[error("Fatal: validator {id} cannot begin unbonding from {status:?}")]
    NotBonded { id: ValidatorId, status: BondStatus },

    /// Jailed validator found inside the bonded set
    #[error("Fatal: jailed validator {0} is bonded")]
    JailedValidatorBonded(ValidatorId),

    /// Cliff tracker disagrees with bonded membership
    #[error("Fatal: cliff mismatch - bonded {bonded}, max {max}, cliff defined: {cliff_defined}")]
    CliffMismatch {
        bonded: usize,
        max: u16,
        cliff_defined: bool,
    },

    /// Bonded set grew past the configured bound
    #[error("Fatal: bonded set size {bonded} exceeds max {max}")]
    BoundExceeded { bonded: usize, max: u16 },

    /// Incremental admission tried to bond more than one validator into a full set
    #[error("Fatal: incremental update for {affected} promoted {promoted} and demoted {demoted}")]
    MultiplePromotions {
        affected: ValidatorId,
        promoted: usize,
        demoted: usize,
    },

    /// Pool bucket would go negative
    #[error("Fatal: pool {bucket} underflow - have {have}, need {need}")]
    PoolUnderflow {
        bucket: &'static str,
        have: u128,
        need: u128,
    },

    /// Derived indexes disagree with the validator table
    #[error("Fatal: index inconsistent: {0}")]
    IndexInconsistent(String),

    // === REJECTED TRANSACTIONS ===
    /// Reported power is negative
    #[error("Negative power {power} reported for validator {id}")]
    NegativePower { id: ValidatorId, power: i64 },

    /// Reported power exceeds what the consensus engine accepts
    #[error("Power {power} for validator {id} exceeds maximum {max}")]
    PowerOverflow { id: ValidatorId, power: i64, max: Power },

    /// Operation requires an existing validator record
    #[error("Unknown validator: {0}")]
    UnknownValidator(ValidatorId),

    /// Unbonding completion requested for a validator that is not unbonding
    #[error("Validator {id} is not unbonding (status {status:?})")]
    NotUnbonding { id: ValidatorId, status: BondStatus },

    /// Unbonding completion requested before the unbonding period elapsed
    #[error("Unbonding of {id} matures at {matures_at}, now {now}")]
    UnbondingNotMatured {
        id: ValidatorId,
        matures_at: u64,
        now: u64,
    },

    /// Unjail requested for a validator that is not jailed
    #[error("Validator {0} is not jailed")]
    NotJailed(ValidatorId),

    /// Parameters failed validation
    #[error("Invalid staking params: {0}")]
    InvalidParams(String),

    /// A block-scoped operation was issued outside a block
    #[error("No block is open")]
    NoOpenBlock,

    /// `begin_block` while another block is still open
    #[error("Block {open} is still open, cannot begin block {requested}")]
    BlockAlreadyOpen { open: u64, requested: u64 },

    /// Genesis lists the same validator twice
    #[error("Duplicate genesis validator: {0}")]
    DuplicateGenesisValidator(ValidatorId),
}

impl ValidatorSetError {
    /// Whether this error aborts the whole block rather than one transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AlreadyBonded(_)
                | Self::BondJailed(_)
                | Self::NotBonded { .. }
                | Self::JailedValidatorBonded(_)
                | Self::CliffMismatch { .. }
                | Self::BoundExceeded { .. }
                | Self::MultiplePromotions { .. }
                | Self::PoolUnderflow { .. }
                | Self::IndexInconsistent(_)
        )
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyBonded(_) => "already_bonded",
            Self::BondJailed(_) => "bond_jailed",
            Self::NotBonded { .. } => "not_bonded",
            Self::JailedValidatorBonded(_) => "jailed_bonded",
            Self::CliffMismatch { .. } => "cliff_mismatch",
            Self::BoundExceeded { .. } => "bound_exceeded",
            Self::MultiplePromotions { .. } => "multiple_promotions",
            Self::PoolUnderflow { .. } => "pool_underflow",
            Self::IndexInconsistent(_) => "index_inconsistent",
            Self::NegativePower { .. } => "negative_power",
            Self::PowerOverflow { .. } => "power_overflow",
            Self::UnknownValidator(_) => "unknown_validator",
            Self::NotUnbonding { .. } => "not_unbonding",
            Self::UnbondingNotMatured { .. } => "unbonding_not_matured",
            Self::NotJailed(_) => "not_jailed",
            Self::InvalidParams(_) => "invalid_params",
            Self::NoOpenBlock => "no_open_block",
            Self::BlockAlreadyOpen { .. } => "block_already_open",
            Self::DuplicateGenesisValidator(_) => "duplicate_genesis_validator",
        }
    }
}

/// Result type for validator set operations
pub type ValidatorSetResult<T> = Result<T, ValidatorSetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_tier_split() {
        let id = ValidatorId::new([1u8; 32]);
        assert!(ValidatorSetError::AlreadyBonded(id).is_fatal());
        assert!(ValidatorSetError::CliffMismatch {
            bonded: 1,
            max: 2,
            cliff_defined: true
        }
        .is_fatal());
        assert!(!ValidatorSetError::UnknownValidator(id).is_fatal());
        assert!(!ValidatorSetError::NegativePower { id, power: -1 }.is_fatal());
        assert!(!ValidatorSetError::NoOpenBlock.is_fatal());
    }

    #[test]
    fn test_error_display_uses_hex_id() {
        let id = ValidatorId::new([0xab; 32]);
        let msg = ValidatorSetError::UnknownValidator(id).to_string();
        assert!(msg.contains("abababab"));
    }
}
