//! Bonded-membership index
//!
//! Membership mirrors `status == Bonded` exactly.

use crate::domain::ValidatorId;
use std::collections::BTreeSet;

/// Identities currently in the bonded set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BondedIndex {
    members: BTreeSet<ValidatorId>,
}

impl BondedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if already present.
    pub fn insert(&mut self, id: ValidatorId) -> bool {
        self.members.insert(id)
    }

    /// Returns false if not present.
    pub fn remove(&mut self, id: &ValidatorId) -> bool {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &ValidatorId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in id order
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorId> {
        self.members.iter()
    }

    /// Owned copy of the membership, used as the "previously bonded" set.
    pub fn snapshot(&self) -> BTreeSet<ValidatorId> {
        self.members.clone()
    }
}
