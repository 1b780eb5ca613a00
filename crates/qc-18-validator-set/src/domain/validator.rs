//! Validator entity and lifecycle
//!
//! ```text
//!             bond (not jailed)
//! [UNBONDED] ─────────────────→ [BONDED]
//!     ↑                          │    ↑
//!     │ complete_unbonding       │    │ bond (not jailed)
//!     │ (now >= min_time)        │    │
//!     │                          ↓    │
//!     └───────────────────── [UNBONDING]
//!                    begin_unbonding (evicted or jailed)
//! ```
//!
//! The guards here only cover the record itself. Index, pool and update
//! buffer side effects live in `service::transitions`.

use crate::domain::{BlockContext, PowerRank};
use crate::error::{ValidatorSetError, ValidatorSetResult};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Voting power reported to the consensus engine
pub type Power = u64;

/// Largest power the consensus engine accepts for a single validator.
pub const MAX_VOTING_POWER: Power = (i64::MAX / 8) as Power;

/// Validator identifier (consensus-key derived, 32 bytes)
///
/// Serialized as a hex string so genesis files stay readable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorId(pub [u8; 32]);

impl ValidatorId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for ValidatorId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorId({})", &hex::encode(self.0)[..16])
    }
}

impl FromStr for ValidatorId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for ValidatorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for ValidatorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Bonding status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// Validator record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub id: ValidatorId,
    pub power: Power,
    /// Tokens backing `power`, moved between pool buckets on transitions
    pub tokens: u128,
    pub status: BondStatus,
    pub jailed: bool,
    /// Tie-break: block height of the current bonding episode
    pub bond_height: u64,
    /// Tie-break: intra-block order of the current bonding episode
    pub bond_intra_tx_counter: u16,
    /// Unix seconds after which unbonding may complete
    pub unbonding_min_time: Option<u64>,
    pub unbonding_height: Option<u64>,
}

impl Validator {
    /// Fresh record on first power report.
    pub fn new(id: ValidatorId) -> Self {
        Self {
            id,
            power: 0,
            tokens: 0,
            status: BondStatus::Unbonded,
            jailed: false,
            bond_height: 0,
            bond_intra_tx_counter: 0,
            unbonding_min_time: None,
            unbonding_height: None,
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    /// Eligible to sit in the bonded set.
    ///
    /// Zero power means "remove" to the consensus engine, so it never bonds.
    pub fn is_eligible(&self) -> bool {
        !self.jailed && self.power > 0
    }

    /// Position in the ordered power index.
    pub fn rank(&self) -> PowerRank {
        PowerRank {
            jailed: self.jailed,
            power: self.power,
            bond_height: self.bond_height,
            bond_intra_tx_counter: self.bond_intra_tx_counter,
            id: self.id,
        }
    }

    /// Unbonded/Unbonding → Bonded.
    pub fn bond(&mut self) -> ValidatorSetResult<()> {
        if self.status == BondStatus::Bonded {
            return Err(ValidatorSetError::AlreadyBonded(self.id));
        }
        if self.jailed {
            return Err(ValidatorSetError::BondJailed(self.id));
        }
        self.status = BondStatus::Bonded;
        self.unbonding_min_time = None;
        self.unbonding_height = None;
        Ok(())
    }

    /// Bonded → Unbonding.
    pub fn begin_unbonding(
        &mut self,
        ctx: &BlockContext,
        unbonding_time_secs: u64,
    ) -> ValidatorSetResult<()> {
        if self.status != BondStatus::Bonded {
            return Err(ValidatorSetError::NotBonded {
                id: self.id,
                status: self.status,
            });
        }
        self.status = BondStatus::Unbonding;
        self.unbonding_min_time = Some(ctx.time.saturating_add(unbonding_time_secs));
        self.unbonding_height = Some(ctx.height);
        Ok(())
    }

    /// Unbonding → Unbonded, once the unbonding period has elapsed.
    pub fn complete_unbonding(&mut self, now: u64) -> ValidatorSetResult<()> {
        if self.status != BondStatus::Unbonding {
            return Err(ValidatorSetError::NotUnbonding {
                id: self.id,
                status: self.status,
            });
        }
        let matures_at = self.unbonding_min_time.unwrap_or(0);
        if now < matures_at {
            return Err(ValidatorSetError::UnbondingNotMatured {
                id: self.id,
                matures_at,
                now,
            });
        }
        self.status = BondStatus::Unbonded;
        self.unbonding_min_time = None;
        self.unbonding_height = None;
        Ok(())
    }

    /// Whether a pending unbonding has matured at `now`.
    pub fn unbonding_matured(&self, now: u64) -> bool {
        self.status == BondStatus::Unbonding
            && self.unbonding_min_time.is_some_and(|t| now >= t)
    }
}
