//! EVM memory implementation

use std::marker::PhantomData;

use tessera_primitives::Word;

use crate::error::{EvmError, EvmResult};
use crate::gas;

/// Pricing policy for memory growth
pub trait ExpansionCost {
    /// Total cost of a memory `words` 32-byte words long
    fn total_cost(words: u64) -> u64;
}

/// `3w + w²/512`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadraticCost;

impl ExpansionCost for QuadraticCost {
    fn total_cost(words: u64) -> u64 {
        gas::memory_word_cost(words)
    }
}

/// EVM memory (byte-addressable, expandable in 32-byte words)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory<P = QuadraticCost> {
    data: Vec<u8>,
    _policy: PhantomData<P>,
}

/// Validate an `(offset, size)` operand pair.
///
/// A zero size is always valid and touches nothing. Otherwise both values
/// must fit in 32 bits.
pub fn checked_range(offset: Word, size: Word) -> EvmResult<(usize, usize)> {
    if size.is_zero() {
        return Ok((0, 0));
    }
    let offset = to_u32_range(offset)?;
    let size = to_u32_range(size)?;
    Ok((offset, size))
}

fn to_u32_range(value: Word) -> EvmResult<usize> {
    value
        .to_u64()
        .filter(|v| *v <= u64::from(u32::MAX))
        .and_then(|v| usize::try_from(v).ok())
        .ok_or(EvmError::InvalidMemoryRange)
}

impl<P: ExpansionCost> Memory<P> {
    /// Create new empty memory
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            _policy: PhantomData,
        }
    }

    /// Get current memory size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Cost of making `[offset, offset + size)` addressable, relative to
    /// what the current size has already paid for
    pub fn expansion_cost(&self, offset: usize, size: usize) -> u64 {
        if size == 0 {
            return 0;
        }
        let new_words = offset.saturating_add(size).div_ceil(32) as u64;
        let old_words = (self.data.len() / 32) as u64;
        if new_words <= old_words {
            return 0;
        }
        P::total_cost(new_words).saturating_sub(P::total_cost(old_words))
    }

    /// Grow to cover `[offset, offset + size)`, rounded up to a word boundary
    pub fn expand(&mut self, offset: usize, size: usize) {
        if size == 0 {
            return;
        }

        let new_size = offset.saturating_add(size);
        if new_size > self.data.len() {
            let new_size_aligned = new_size.div_ceil(32) * 32;
            self.data.resize(new_size_aligned, 0);
        }
    }

    /// `size` bytes from `offset`, expanding first
    pub fn access(&mut self, offset: usize, size: usize) -> &[u8] {
        if size == 0 {
            return &[];
        }
        self.expand(offset, size);
        &self.data[offset..offset + size]
    }

    /// Write `bytes` at `offset`, expanding first
    pub fn store(&mut self, offset: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.expand(offset, bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Load a 32-byte word
    pub fn load_word(&mut self, offset: usize) -> Word {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(self.access(offset, 32));
        Word::from_be_bytes(bytes)
    }

    /// Store a 32-byte word
    pub fn store_word(&mut self, offset: usize, value: Word) {
        self.store(offset, &value.to_be_bytes());
    }

    /// Store the low byte of `value`
    pub fn store_byte(&mut self, offset: usize, value: Word) {
        let bytes = value.to_be_bytes();
        self.store(offset, &bytes[31..]);
    }

    /// Clear memory
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get raw data slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Mem = Memory<QuadraticCost>;

    #[test]
    fn test_memory_expand() {
        let mut mem = Mem::new();
        assert_eq!(mem.size(), 0);

        mem.expand(0, 32);
        assert_eq!(mem.size(), 32);

        mem.expand(0, 33);
        assert_eq!(mem.size(), 64);

        // Never shrinks
        mem.expand(0, 1);
        assert_eq!(mem.size(), 64);
    }

    #[test]
    fn test_memory_expand_zero_size() {
        let mut mem = Mem::new();
        mem.expand(1000, 0);
        assert_eq!(mem.size(), 0);
        assert_eq!(mem.expansion_cost(1000, 0), 0);
    }

    #[test]
    fn test_memory_word_roundtrip() {
        let mut mem = Mem::new();
        mem.store_word(0, Word::from(0x1234u64));
        assert_eq!(mem.load_word(0), Word::from(0x1234u64));
        assert_eq!(mem.data()[30], 0x12);
        assert_eq!(mem.data()[31], 0x34);
    }

    #[test]
    fn test_memory_load_expands_zero_filled() {
        let mut mem = Mem::new();
        assert_eq!(mem.load_word(10), Word::ZERO);
        assert_eq!(mem.size(), 64);
    }

    #[test]
    fn test_memory_store_byte() {
        let mut mem = Mem::new();
        mem.store_byte(5, Word::from(0x1FFu64));
        assert_eq!(mem.size(), 32);
        assert_eq!(mem.data()[5], 0xFF);
    }

    #[test]
    fn test_memory_access_slice() {
        let mut mem = Mem::new();
        mem.store(3, &[1, 2, 3]);
        assert_eq!(mem.access(2, 5), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_expansion_cost_incremental() {
        let mut mem = Mem::new();
        assert_eq!(mem.expansion_cost(0, 32), 3);
        mem.expand(0, 32);
        assert_eq!(mem.expansion_cost(0, 32), 0);
        assert_eq!(mem.expansion_cost(0, 64), 3);
        assert_eq!(
            mem.expansion_cost(0, 1024),
            gas::memory_word_cost(32) - gas::memory_word_cost(1)
        );
    }

    #[test]
    fn test_expansion_cost_monotonic() {
        let mem = Mem::new();
        let mut last = 0;
        for words in 1..200usize {
            let cost = mem.expansion_cost(0, words * 32);
            assert!(cost >= last);
            last = cost;
        }
    }

    #[test]
    fn test_checked_range() {
        assert_eq!(checked_range(Word::from(4u64), Word::from(32u64)), Ok((4, 32)));
        assert_eq!(checked_range(Word::MAX, Word::ZERO), Ok((0, 0)));
        assert_eq!(
            checked_range(Word::MAX, Word::ONE),
            Err(EvmError::InvalidMemoryRange)
        );
        assert_eq!(
            checked_range(Word::ZERO, Word::from(1u64 << 32)),
            Err(EvmError::InvalidMemoryRange)
        );
    }

    struct FlatCost;

    impl ExpansionCost for FlatCost {
        fn total_cost(words: u64) -> u64 {
            words
        }
    }

    #[test]
    fn test_custom_policy() {
        let mut mem: Memory<FlatCost> = Memory::new();
        assert_eq!(mem.expansion_cost(0, 64 * 32), 64);
        mem.expand(0, 32);
        assert_eq!(mem.expansion_cost(0, 64 * 32), 63);
    }
}
