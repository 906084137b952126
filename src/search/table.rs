//! Transposition table: results of already searched positions.

use std::collections::HashMap;
use std::hash::Hash;

use super::WIN_THRESHOLD;

/// What the stored score says about the real value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is the value of the position.
    Exact,
    /// The search failed high; the value is at least the score.
    Lower,
    /// The search failed low; the value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry<M> {
    /// Remaining depth the position was searched with.
    pub depth: usize,
    /// Score as seen from the stored position, see [`to_node_relative`].
    pub score: i32,
    pub best_move: Option<M>,
    pub bound: Bound,
}

impl<M> TableEntry<M> {
    /// Returns the stored score, re-based to `ply`, if it settles the value of
    /// a node searched with the window `(alpha, beta)` to the remaining
    /// `depth`.
    #[must_use]
    pub const fn usable_score(&self, ply: usize, depth: usize, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        let score = from_node_relative(self.score, ply);
        let conclusive = match self.bound {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        };
        if conclusive { Some(score) } else { None }
    }
}

/// Win and loss scores count plies from the root. The same position can be
/// reached at different plies, so the table keeps them counted from the
/// position itself.
#[must_use]
pub const fn to_node_relative(score: i32, ply: usize) -> i32 {
    if score > WIN_THRESHOLD {
        score + ply as i32
    } else if score < -WIN_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`to_node_relative`].
#[must_use]
pub const fn from_node_relative(score: i32, ply: usize) -> i32 {
    if score > WIN_THRESHOLD {
        score - ply as i32
    } else if score < -WIN_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Map from position fingerprint to [`TableEntry`]. Only lives for one
/// search; scores depend on the depth and window they were searched with.
#[derive(Debug, Clone)]
pub struct TranspositionTable<K, M> {
    entries: HashMap<K, TableEntry<M>>,
}

impl<K: Hash + Eq, M> Default for TranspositionTable<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, M> TranspositionTable<K, M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn probe(&self, key: &K) -> Option<&TableEntry<M>> {
        self.entries.get(key)
    }

    /// Stores an entry. An existing entry for the same position is only
    /// replaced by one searched at least as deep.
    pub fn store(&mut self, key: K, entry: TableEntry<M>) {
        match self.entries.get(&key) {
            Some(existing) if existing.depth > entry.depth => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{INFINITY, WIN_SCORE};

    fn entry(depth: usize, score: i32, bound: Bound) -> TableEntry<usize> {
        TableEntry {
            depth,
            score,
            best_move: Some(3),
            bound,
        }
    }

    #[test]
    fn test_usable_score_respects_bounds() {
        assert_eq!(entry(4, 10, Bound::Exact).usable_score(0, 4, -100, 100), Some(10));
        assert_eq!(entry(5, 10, Bound::Exact).usable_score(0, 4, -100, 100), Some(10));
        assert_eq!(entry(3, 10, Bound::Exact).usable_score(0, 4, -100, 100), None);

        // lower bound only helps at or above beta
        assert_eq!(entry(4, 10, Bound::Lower).usable_score(0, 4, -100, 10), Some(10));
        assert_eq!(entry(4, 10, Bound::Lower).usable_score(0, 4, -100, 11), None);

        // upper bound only helps at or below alpha
        assert_eq!(entry(4, 10, Bound::Upper).usable_score(0, 4, 10, 100), Some(10));
        assert_eq!(entry(4, 10, Bound::Upper).usable_score(0, 4, 9, 100), None);
    }

    #[test]
    fn test_win_scores_are_rebased() {
        let win_in_three = WIN_SCORE - 3;
        let stored = to_node_relative(win_in_three, 2);
        assert_eq!(stored, WIN_SCORE - 1);
        assert_eq!(from_node_relative(stored, 2), win_in_three);
        assert_eq!(from_node_relative(stored, 5), WIN_SCORE - 6);

        let loss_in_four = -(WIN_SCORE - 4);
        assert_eq!(to_node_relative(loss_in_four, 3), -(WIN_SCORE - 1));
        assert_eq!(from_node_relative(to_node_relative(loss_in_four, 3), 3), loss_in_four);

        assert_eq!(to_node_relative(42, 7), 42);
        assert_eq!(
            entry(4, stored, Bound::Exact).usable_score(4, 4, -INFINITY, INFINITY),
            Some(WIN_SCORE - 5)
        );
    }

    #[test]
    fn test_store_keeps_deeper_entry() {
        let mut table = TranspositionTable::new();
        assert!(table.is_empty());

        table.store("a", entry(4, 1, Bound::Exact));
        table.store("a", entry(2, 2, Bound::Exact));
        assert_eq!(table.probe(&"a").map(|e| e.score), Some(1));

        table.store("a", entry(4, 3, Bound::Lower));
        assert_eq!(table.probe(&"a").map(|e| e.bound), Some(Bound::Lower));
        assert_eq!(table.len(), 1);

        table.clear();
        assert!(table.probe(&"a").is_none());
    }
}
