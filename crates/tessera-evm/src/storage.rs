//! Contract storage with warm/cold access tracking

use std::collections::{HashMap, HashSet};

use tessera_primitives::Word;

/// Records which keys have been touched during an execution
pub trait AccessTracker: Default {
    /// Mark `key` accessed, returning whether it already was
    fn touch(&mut self, key: Word) -> bool;

    /// Whether `key` has been accessed
    fn is_warm(&self, key: &Word) -> bool;

    /// Forget all accesses
    fn clear(&mut self);
}

/// Warm set for persistent storage (EIP-2929). Starts empty, only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmKeys(HashSet<Word>);

impl AccessTracker for WarmKeys {
    fn touch(&mut self, key: Word) -> bool {
        !self.0.insert(key)
    }

    fn is_warm(&self, key: &Word) -> bool {
        self.0.contains(key)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// No warm/cold distinction; every key reads as warm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Untracked;

impl AccessTracker for Untracked {
    fn touch(&mut self, _key: Word) -> bool {
        true
    }

    fn is_warm(&self, _key: &Word) -> bool {
        true
    }

    fn clear(&mut self) {}
}

/// Key-value word store. Absent keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage<T = WarmKeys> {
    slots: HashMap<Word, Word>,
    tracker: T,
}

/// Persistent storage, priced by warmth
pub type PersistentStorage = Storage<WarmKeys>;

/// Transient storage (EIP-1153), flat priced and discarded after the run
pub type TransientStorage = Storage<Untracked>;

impl<T: AccessTracker> Storage<T> {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`, marking it warm. Returns `(was_warm, value)`.
    pub fn load(&mut self, key: Word) -> (bool, Word) {
        let was_warm = self.tracker.touch(key);
        (was_warm, self.get(&key))
    }

    /// Write `key`, marking it warm. Returns `(was_warm, old_value)`.
    pub fn store(&mut self, key: Word, value: Word) -> (bool, Word) {
        let was_warm = self.tracker.touch(key);
        let old = if value.is_zero() {
            self.slots.remove(&key)
        } else {
            self.slots.insert(key, value)
        };
        (was_warm, old.unwrap_or(Word::ZERO))
    }

    /// Read without touching the warm set
    pub fn get(&self, key: &Word) -> Word {
        self.slots.get(key).copied().unwrap_or(Word::ZERO)
    }

    /// Whether `key` has been accessed
    pub fn is_warm(&self, key: &Word) -> bool {
        self.tracker.is_warm(key)
    }

    /// Non-zero slots
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &Word)> {
        self.slots.iter()
    }

    /// Number of non-zero slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// No non-zero slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop all slots and accesses
    pub fn clear(&mut self) {
        self.slots.clear();
        self.tracker.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(v: u64) -> Word {
        Word::from(v)
    }

    #[test]
    fn test_load_cold_then_warm() {
        let mut storage = PersistentStorage::new();
        assert_eq!(storage.load(w(1)), (false, Word::ZERO));
        assert_eq!(storage.load(w(1)), (true, Word::ZERO));
        assert!(storage.is_warm(&w(1)));
        assert!(!storage.is_warm(&w(2)));
    }

    #[test]
    fn test_store_returns_old_value() {
        let mut storage = PersistentStorage::new();
        assert_eq!(storage.store(w(1), w(5)), (false, Word::ZERO));
        assert_eq!(storage.store(w(1), w(7)), (true, w(5)));
        assert_eq!(storage.load(w(1)), (true, w(7)));
    }

    #[test]
    fn test_store_marks_warm_for_load() {
        let mut storage = PersistentStorage::new();
        storage.store(w(9), w(1));
        assert!(storage.load(w(9)).0);
    }

    #[test]
    fn test_store_zero_removes_slot() {
        let mut storage = PersistentStorage::new();
        storage.store(w(1), w(5));
        assert_eq!(storage.len(), 1);
        storage.store(w(1), Word::ZERO);
        assert!(storage.is_empty());
        assert_eq!(storage.get(&w(1)), Word::ZERO);
        // Warmth survives the delete
        assert!(storage.is_warm(&w(1)));
    }

    #[test]
    fn test_transient_always_warm() {
        let mut storage = TransientStorage::new();
        assert_eq!(storage.load(w(3)), (true, Word::ZERO));
        assert_eq!(storage.store(w(3), w(4)), (true, Word::ZERO));
        assert_eq!(storage.get(&w(3)), w(4));
    }

    #[test]
    fn test_clear_forgets_warmth() {
        let mut storage = PersistentStorage::new();
        storage.store(w(1), w(2));
        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.load(w(1)), (false, Word::ZERO));
    }
}
