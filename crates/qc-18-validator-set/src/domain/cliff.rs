//! Cliff tracker
//!
//! Holds the lowest-ranked member of a full bonded set, the first validator
//! evicted when a higher-ranked candidate arrives. Undefined while the set
//! has spare capacity.

use crate::domain::{Power, PowerRank, ValidatorId};
use serde::{Deserialize, Serialize};

/// Cliff validator snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliffValidator {
    pub id: ValidatorId,
    pub rank: PowerRank,
}

impl CliffValidator {
    pub fn power(&self) -> Power {
        self.rank.power
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliffTracker {
    cliff: Option<CliffValidator>,
}

impl CliffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, rank: PowerRank) {
        self.cliff = Some(CliffValidator { id: rank.id, rank });
    }

    pub fn clear(&mut self) {
        self.cliff = None;
    }

    pub fn get(&self) -> Option<&CliffValidator> {
        self.cliff.as_ref()
    }

    pub fn is_defined(&self) -> bool {
        self.cliff.is_some()
    }

    /// Whether `id` is the cliff validator
    pub fn is(&self, id: &ValidatorId) -> bool {
        self.cliff.as_ref().is_some_and(|c| c.id == *id)
    }

    pub fn power(&self) -> Option<Power> {
        self.cliff.as_ref().map(CliffValidator::power)
    }
}
