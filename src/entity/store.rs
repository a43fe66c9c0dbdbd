use crate::entity::word::Word;
use crate::foundation::core::{Point, Rgb8};

/// Stable handle to a word in an [`EntityStore`].
///
/// Ids are never reused within a store, so a handle to a removed word simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Ordered collection of live words.
///
/// Spawn order is draw order; culling keeps survivors in their relative order.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    entries: Vec<(EntityId, Word)>,
    fade_threshold: Option<f64>,
}

impl EntityStore {
    /// Empty store using the default fade threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store whose words fade below `threshold` of their lifetime.
    pub fn with_fade_threshold(threshold: f64) -> Self {
        Self {
            fade_threshold: Some(threshold),
            ..Self::default()
        }
    }

    /// Create a word and return its handle.
    pub fn spawn(
        &mut self,
        text: impl Into<String>,
        position: Point,
        scale: f64,
        color: Rgb8,
        lifetime: f64,
    ) -> EntityId {
        let mut word = Word::new(text, position, scale, color, lifetime);
        if let Some(t) = self.fade_threshold {
            word = word.with_fade_threshold(t);
        }
        self.insert(word)
    }

    /// Adopt an already-built word.
    pub fn insert(&mut self, word: Word) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push((id, word));
        id
    }

    /// Look up a word.
    pub fn get(&self, id: EntityId) -> Option<&Word> {
        self.position_of(id).map(|i| &self.entries[i].1)
    }

    /// Look up a word mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Word> {
        self.position_of(id).map(move |i| &mut self.entries[i].1)
    }

    /// Whether the word is dead; unknown handles count as dead.
    pub fn is_dead(&self, id: EntityId) -> bool {
        self.get(id).is_none_or(Word::is_dead)
    }

    /// Restart one word. Returns `false` for an unknown handle.
    pub fn trigger(&mut self, id: EntityId, new_scale: f64) -> bool {
        match self.get_mut(id) {
            Some(w) => {
                w.trigger(new_scale);
                true
            }
            None => false,
        }
    }

    /// Restart every word with a scale chosen per word.
    pub fn trigger_all_with(&mut self, mut scale: impl FnMut() -> f64) {
        for (_, w) in &mut self.entries {
            w.trigger(scale());
        }
    }

    /// Advance every word by one frame.
    pub fn update_all(&mut self) {
        for (_, w) in &mut self.entries {
            w.update();
        }
    }

    /// Drop every word whose opacity reached zero. Returns how many were removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, w)| !w.is_dead());
        before - self.entries.len()
    }

    /// Remove every word.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of words held (dead ones included until [`EntityStore::remove_dead`]).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Words in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Word)> {
        self.entries.iter().map(|(id, w)| (*id, w))
    }

    /// Words in draw order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Word)> {
        self.entries.iter_mut().map(|(id, w)| (*id, w))
    }

    /// Word at draw-order position `index`.
    pub fn nth_mut(&mut self, index: usize) -> Option<&mut Word> {
        self.entries.get_mut(index).map(|(_, w)| w)
    }

    fn position_of(&self, id: EntityId) -> Option<usize> {
        // Ids are assigned in increasing order and removal preserves order.
        self.entries.binary_search_by_key(&id, |(eid, _)| *eid).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/store.rs"]
mod tests;
