//! Open set for the incremental A* search.
//!
//! An indexed binary min-heap: every position has at most one entry, and a
//! side table maps positions to heap slots so a priority can be lowered in
//! place in O(log n) instead of rebuilding the heap.

use crate::grid::Position;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct Entry {
    position: Position,
    f: f64,
    order: u64,
}

impl Entry {
    /// Lower `f` first, then earlier insertion.
    fn cmp_priority(&self, other: &Entry) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.order.cmp(&other.order))
    }
}

#[derive(Debug, Default)]
pub struct OpenSet {
    heap: Vec<Entry>,
    slots: FxHashMap<Position, usize>,
    next_order: u64,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.slots.contains_key(position)
    }

    /// Adds a position. Returns `false` and leaves the set untouched if the
    /// position already has an entry.
    pub fn insert(&mut self, position: Position, f: f64) -> bool {
        if self.contains(&position) {
            return false;
        }

        let slot = self.heap.len();
        self.heap.push(Entry {
            position,
            f,
            order: self.next_order,
        });
        self.next_order += 1;
        self.slots.insert(position, slot);
        self.sift_up(slot);
        true
    }

    /// Lowers the priority of an existing entry. The entry keeps its
    /// insertion order for tie-breaking. Returns `false` if the position is
    /// absent or `f` is not lower than the stored priority.
    pub fn decrease_priority(&mut self, position: &Position, f: f64) -> bool {
        let Some(&slot) = self.slots.get(position) else {
            return false;
        };
        if f.total_cmp(&self.heap[slot].f) != Ordering::Less {
            return false;
        }

        self.heap[slot].f = f;
        self.sift_up(slot);
        true
    }

    /// Removes and returns the entry with the lowest priority.
    pub fn pop_min(&mut self) -> Option<(Position, f64)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.position);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((entry.position, entry.f))
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].position, a);
        self.slots.insert(self.heap[b].position, b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].cmp_priority(&self.heap[parent]) != Ordering::Less {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.heap[left].cmp_priority(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && self.heap[right].cmp_priority(&self.heap[smallest]) == Ordering::Less
            {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_pops_in_priority_order() {
        let mut open = OpenSet::new();
        open.insert(pos(0, 0), 3.0);
        open.insert(pos(1, 0), 1.0);
        open.insert(pos(2, 0), 2.0);

        assert_eq!(open.pop_min(), Some((pos(1, 0), 1.0)));
        assert_eq!(open.pop_min(), Some((pos(2, 0), 2.0)));
        assert_eq!(open.pop_min(), Some((pos(0, 0), 3.0)));
        assert_eq!(open.pop_min(), None);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let mut open = OpenSet::new();
        for x in 0..6 {
            open.insert(pos(x, 0), 4.0);
        }

        let popped: Vec<_> = std::iter::from_fn(|| open.pop_min()).map(|(p, _)| p.x).collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_no_duplicate_entries() {
        let mut open = OpenSet::new();
        assert!(open.insert(pos(1, 1), 5.0));
        assert!(!open.insert(pos(1, 1), 2.0));

        assert_eq!(open.len(), 1);
        assert_eq!(open.pop_min(), Some((pos(1, 1), 5.0)));
        assert!(open.is_empty());
    }

    #[test]
    fn test_decrease_priority_reorders_in_place() {
        let mut open = OpenSet::new();
        open.insert(pos(0, 0), 2.0);
        open.insert(pos(1, 0), 5.0);
        open.insert(pos(2, 0), 3.0);

        assert!(open.decrease_priority(&pos(1, 0), 1.0));
        assert!(!open.decrease_priority(&pos(2, 0), 4.0));
        assert!(!open.decrease_priority(&pos(9, 9), 0.0));

        assert_eq!(open.len(), 3);
        assert_eq!(open.pop_min(), Some((pos(1, 0), 1.0)));
        assert!(!open.contains(&pos(1, 0)));
        assert_eq!(open.pop_min(), Some((pos(0, 0), 2.0)));
        assert_eq!(open.pop_min(), Some((pos(2, 0), 3.0)));
    }

    #[test]
    fn test_decreased_entry_keeps_its_insertion_order() {
        let mut open = OpenSet::new();
        open.insert(pos(0, 0), 2.0);
        open.insert(pos(1, 0), 3.0);
        open.decrease_priority(&pos(1, 0), 2.0);

        assert_eq!(open.pop_min().map(|(p, _)| p), Some(pos(0, 0)));
        assert_eq!(open.pop_min().map(|(p, _)| p), Some(pos(1, 0)));
    }

    #[test]
    fn test_random_operations_match_sorted_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut open = OpenSet::new();
        let mut expected: Vec<(f64, u64, Position)> = Vec::new();

        for i in 0..200 {
            let p = pos(i, 0);
            let f = f64::from(rng.gen_range(0..50));
            open.insert(p, f);
            expected.push((f, i as u64, p));
        }
        for _ in 0..100 {
            let i = rng.gen_range(0..200usize);
            let lowered = expected[i].0 - f64::from(rng.gen_range(1..10));
            if open.decrease_priority(&expected[i].2, lowered) {
                expected[i].0 = lowered;
            }
        }

        expected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (f, _, p) in expected {
            assert_eq!(open.pop_min(), Some((p, f)));
        }
        assert!(open.is_empty());
    }
}
