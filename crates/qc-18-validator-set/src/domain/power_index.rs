//! # Ordered Power Index
//!
//! Validators sorted by rank, highest first.
//!
//! ## Ordering
//!
//! ```text
//! non-jailed  >  jailed
//! power       :  higher first
//! bond_height :  lower first   (earlier bonding episode wins)
//! intra-tx    :  lower first
//! id          :  lower first   (total order, no ties)
//! ```
//!
//! `PowerRank` implements `Ord` so that ascending `BTreeMap` order is
//! descending rank. Jailed validators always sort after every eligible one,
//! which lets the admission scan stop at the first jailed entry.

use crate::domain::{Power, ValidatorId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Composite sort key of a validator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerRank {
    pub jailed: bool,
    pub power: Power,
    pub bond_height: u64,
    pub bond_intra_tx_counter: u16,
    pub id: ValidatorId,
}

impl PowerRank {
    /// Whether `self` ranks strictly above `other`.
    pub fn outranks(&self, other: &PowerRank) -> bool {
        self < other
    }
}

impl Ord for PowerRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.jailed
            .cmp(&other.jailed)
            .then_with(|| other.power.cmp(&self.power))
            .then_with(|| self.bond_height.cmp(&other.bond_height))
            .then_with(|| self.bond_intra_tx_counter.cmp(&other.bond_intra_tx_counter))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for PowerRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Validators by rank, with a reverse map for single-key re-keying
#[derive(Clone, Debug, Default)]
pub struct PowerIndex {
    by_rank: BTreeMap<PowerRank, ValidatorId>,
    rank_of: HashMap<ValidatorId, PowerRank>,
}

impl PowerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or re-key a validator.
    ///
    /// Returns the previous rank if the validator was already indexed.
    pub fn insert(&mut self, rank: PowerRank) -> Option<PowerRank> {
        let previous = self.rank_of.insert(rank.id, rank);
        if let Some(old) = previous {
            self.by_rank.remove(&old);
        }
        self.by_rank.insert(rank, rank.id);
        previous
    }

    /// Current rank of a validator
    pub fn rank_of(&self, id: &ValidatorId) -> Option<&PowerRank> {
        self.rank_of.get(id)
    }

    /// Iterate from the highest rank down.
    pub fn iter(&self) -> impl Iterator<Item = (&PowerRank, &ValidatorId)> {
        self.by_rank.iter()
    }

    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }

    /// Both maps agree entry for entry.
    pub fn is_consistent(&self) -> bool {
        self.by_rank.len() == self.rank_of.len()
            && self
                .by_rank
                .iter()
                .all(|(rank, id)| rank.id == *id && self.rank_of.get(id) == Some(rank))
    }
}
