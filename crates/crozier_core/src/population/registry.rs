//! Dense storage of the live nests with an ID index.
//!
//! Nests sit in a `Vec` and are removed with `swap_remove`; the index entry
//! of the nest moved into the hole is patched in the same call, so lookups
//! stay valid after every insertion and removal.

use crate::nest::Nest;
use crozier_data::NestId;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct NestRegistry {
    nests: Vec<Nest>,
    index: HashMap<NestId, usize>,
}

impl NestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a nest. Replacing a live ID is a caller bug and is ignored.
    pub fn insert(&mut self, nest: Nest) -> bool {
        if self.index.contains_key(&nest.id) {
            return false;
        }
        self.index.insert(nest.id, self.nests.len());
        self.nests.push(nest);
        true
    }

    pub fn remove(&mut self, id: NestId) -> Option<Nest> {
        let slot = self.index.remove(&id)?;
        let nest = self.nests.swap_remove(slot);
        if let Some(moved) = self.nests.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Some(nest)
    }

    pub fn index_of(&self, id: NestId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: NestId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: NestId) -> Option<&Nest> {
        self.index_of(id).map(|i| &self.nests[i])
    }

    pub fn get_mut(&mut self, id: NestId) -> Option<&mut Nest> {
        let i = self.index_of(id)?;
        self.nests.get_mut(i)
    }

    pub fn len(&self) -> usize {
        self.nests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nests.is_empty()
    }

    pub fn as_slice(&self) -> &[Nest] {
        &self.nests
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Nest> {
        self.nests.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Nest> {
        self.nests.iter_mut()
    }

    /// Live IDs in storage order.
    pub fn ids(&self) -> Vec<NestId> {
        self.nests.iter().map(|n| n.id).collect()
    }

    /// Live stocks in storage order.
    pub fn stocks(&self) -> Vec<f64> {
        self.nests.iter().map(|n| n.stock).collect()
    }
}
