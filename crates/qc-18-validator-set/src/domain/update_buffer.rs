//! Per-block update buffer
//!
//! Block-scoped map from validator to the power the consensus engine should
//! see at block end. Later writes overwrite earlier ones, and
//! draining yields id order so every replica serializes the same list.

use crate::domain::{Power, ValidatorId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the end-of-block update list. `power == 0` removes the
/// validator from the consensus engine's active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    pub id: ValidatorId,
    pub power: Power,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateBuffer {
    entries: BTreeMap<ValidatorId, Power>,
}

impl UpdateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the power to report for `id`, replacing any earlier entry.
    pub fn record(&mut self, id: ValidatorId, power: Power) {
        self.entries.insert(id, power);
    }

    pub fn get(&self, id: &ValidatorId) -> Option<Power> {
        self.entries.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry in id order, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<ValidatorUpdate> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(id, power)| ValidatorUpdate { id, power })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ValidatorId {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        ValidatorId(bytes)
    }

    #[test]
    fn test_last_writer_wins() {
        let mut buffer = UpdateBuffer::new();
        buffer.record(id(1), 10);
        buffer.record(id(1), 0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(&id(1)), Some(0));
    }

    #[test]
    fn test_drain_sorted_and_clears() {
        let mut buffer = UpdateBuffer::new();
        buffer.record(id(3), 30);
        buffer.record(id(1), 10);
        buffer.record(id(2), 20);

        let updates = buffer.drain();
        let ids: Vec<_> = updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![id(1), id(2), id(3)]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }
}
