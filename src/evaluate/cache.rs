use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHashMap;

enum Store {
    Unbounded(FxHashMap<Box<[u32]>, f64>),
    Bounded(LruCache<Box<[u32]>, f64>),
}

/// Heuristic scores keyed by the row-major tile values of a board.
///
/// A board's score depends only on its tiles, so entries never go stale.
/// Without a capacity the cache grows for the lifetime of the engine; with
/// one it evicts the least recently used board.
pub struct EvaluationCache {
    store: Store,
    hits: usize,
    misses: usize,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl EvaluationCache {
    pub fn unbounded() -> Self {
        Self::with_store(Store::Unbounded(FxHashMap::default()))
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::with_store(Store::Bounded(LruCache::new(capacity)))
    }

    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        capacity.map_or_else(Self::unbounded, Self::bounded)
    }

    fn with_store(store: Store) -> Self {
        Self {
            store,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, tiles: &[u32]) -> Option<f64> {
        let cached = match &mut self.store {
            Store::Unbounded(map) => map.get(tiles).copied(),
            Store::Bounded(lru) => lru.get(tiles).copied(),
        };
        match cached {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        cached
    }

    pub fn insert(&mut self, tiles: &[u32], score: f64) {
        let key: Box<[u32]> = tiles.into();
        match &mut self.store {
            Store::Unbounded(map) => {
                map.insert(key, score);
            }
            Store::Bounded(lru) => {
                lru.put(key, score);
            }
        }
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Unbounded(map) => map.len(),
            Store::Bounded(lru) => lru.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` for an unbounded cache.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        match &self.store {
            Store::Unbounded(_) => None,
            Store::Bounded(lru) => Some(lru.cap()),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
