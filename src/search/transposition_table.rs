//! Fixed-size transposition table keyed by [`position_hash`].
//!
//! Direct-indexed, last-write-wins. A cached score is only reused when it was
//! searched at least as deep and already lies outside the caller's window.
//!
//! [`position_hash`]: crate::search::position_hash::position_hash

use crate::game_state::chess_types::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new(entry_count: usize) -> Self {
        Self {
            entries: vec![None; entry_count.max(1)],
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Raw lookup by key, ignoring depth and window.
    pub fn entry(&self, key: u64) -> Option<TTEntry> {
        self.entries[self.idx(key)].filter(|e| e.key == key)
    }

    /// Cached score usable at `depth` inside `(alpha, beta)`, if any.
    pub fn probe(&mut self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        self.stats.probes += 1;
        let usable = self
            .entry(key)
            .filter(|e| e.depth >= depth && (e.score <= alpha || e.score >= beta))
            .map(|e| e.score);
        if usable.is_some() {
            self.stats.hits += 1;
        }
        usable
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        self.entries[idx] = Some(entry);
    }
}
