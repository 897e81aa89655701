//! Energy-ordered activation queue.
//!
//! Actors are ordered by current energy, highest first. Ties go to the
//! lower [`EntityId`], i.e. the actor created first, so two runs over the
//! same state always produce the same order.
//!
//! Re-adding an actor replaces its previous priority. Superseded heap
//! entries are skipped lazily when popped.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use super::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Entry {
    energy: i32,
    id: EntityId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.energy
            .cmp(&other.energy)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnScheduler {
    heap: BinaryHeap<Entry>,
    /// Live priority per queued actor; heap entries that disagree are stale.
    queued: BTreeMap<EntityId, i32>,
}

impl PartialEq for TurnScheduler {
    fn eq(&self, other: &Self) -> bool {
        self.queued == other.queued
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or re-prioritises `id`. Actors without positive energy are
    /// not eligible and are dropped instead.
    pub fn add(&mut self, id: EntityId, energy: i32) {
        if energy <= 0 {
            self.remove(id);
            return;
        }
        self.queued.insert(id, energy);
        self.heap.push(Entry { energy, id });
        if self.heap.len() > 4 * self.queued.len() + 16 {
            self.compact();
        }
    }

    pub fn remove(&mut self, id: EntityId) {
        self.queued.remove(&id);
    }

    /// Pops the actor with the most energy.
    ///
    /// # Panics
    ///
    /// Panics when nothing is pending; callers check [`Self::has_pending`].
    pub fn next(&mut self) -> EntityId {
        while let Some(entry) = self.heap.pop() {
            if self.queued.get(&entry.id) == Some(&entry.energy) {
                self.queued.remove(&entry.id);
                return entry.id;
            }
        }
        panic!("TurnScheduler::next called with no pending actors");
    }

    /// Actor [`Self::next`] would return, without removing it.
    pub fn peek(&self) -> Option<EntityId> {
        self.queued
            .iter()
            .map(|(&id, &energy)| Entry { energy, id })
            .max()
            .map(|entry| entry.id)
    }

    pub fn has_pending(&self) -> bool {
        !self.queued.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.queued.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.queued.clear();
    }

    fn compact(&mut self) {
        self.heap = self
            .queued
            .iter()
            .map(|(&id, &energy)| Entry { energy, id })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_highest_energy_first() {
        let mut scheduler = TurnScheduler::new();
        scheduler.add(EntityId(1), 50);
        scheduler.add(EntityId(2), 150);
        scheduler.add(EntityId(3), 100);

        assert_eq!(scheduler.next(), EntityId(2));
        assert_eq!(scheduler.next(), EntityId(3));
        assert_eq!(scheduler.next(), EntityId(1));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn ties_go_to_earlier_created_actor() {
        let mut scheduler = TurnScheduler::new();
        scheduler.add(EntityId(7), 100);
        scheduler.add(EntityId(0), 100);
        scheduler.add(EntityId(3), 100);

        assert_eq!(scheduler.peek(), Some(EntityId(0)));
        assert_eq!(scheduler.next(), EntityId(0));
        assert_eq!(scheduler.next(), EntityId(3));
        assert_eq!(scheduler.next(), EntityId(7));
    }

    #[test]
    fn re_adding_replaces_priority() {
        let mut scheduler = TurnScheduler::new();
        scheduler.add(EntityId(1), 200);
        scheduler.add(EntityId(2), 150);
        scheduler.add(EntityId(1), 100);

        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.next(), EntityId(2));
        assert_eq!(scheduler.next(), EntityId(1));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn non_positive_energy_is_not_eligible() {
        let mut scheduler = TurnScheduler::new();
        scheduler.add(EntityId(1), 40);
        scheduler.add(EntityId(1), 0);
        scheduler.add(EntityId(2), -60);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn removed_actor_is_skipped() {
        let mut scheduler = TurnScheduler::new();
        scheduler.add(EntityId(1), 300);
        scheduler.add(EntityId(2), 100);
        scheduler.remove(EntityId(1));
        assert_eq!(scheduler.next(), EntityId(2));
    }

    #[test]
    #[should_panic(expected = "no pending actors")]
    fn popping_empty_scheduler_panics() {
        TurnScheduler::new().next();
    }

    #[test]
    fn repeated_adds_stay_bounded() {
        let mut scheduler = TurnScheduler::new();
        for energy in 1..1_000 {
            scheduler.add(EntityId(1), energy);
        }
        assert!(scheduler.heap.len() <= 4 * scheduler.queued.len() + 16);
        assert_eq!(scheduler.next(), EntityId(1));
    }
}
