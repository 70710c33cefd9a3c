use primitive_types::H256;
use std::collections::BTreeMap;

/// Flat word-addressed state that [`crate::Storage`] is layered on.
///
/// Unset words read as zero. Backends are not metered, the storage layer
/// charges for every access before reaching them.
pub trait StateBackend {
    fn get(&self, key: &H256) -> H256;
    fn set(&mut self, key: H256, value: H256);
}

/// An in-memory backend intended for tests and simulation.
#[derive(Debug, Default, Clone)]
pub struct MemoryState {
    // A BTreeMap keeps iteration and debug output deterministic.
    words: BTreeMap<H256, H256>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-zero words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl StateBackend for MemoryState {
    fn get(&self, key: &H256) -> H256 {
        self.words.get(key).copied().unwrap_or_default()
    }

    fn set(&mut self, key: H256, value: H256) {
        if value.is_zero() {
            self.words.remove(&key);
        } else {
            self.words.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_words_are_not_kept() {
        let mut state = MemoryState::new();
        let key = H256::repeat_byte(7);
        assert_eq!(state.get(&key), H256::zero());
        state.set(key, H256::repeat_byte(3));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&key), H256::repeat_byte(3));
        state.set(key, H256::zero());
        assert!(state.is_empty());
    }
}
