//! # tessera-primitives
//!
//! Primitive value types for the Tessera EVM.
//!
//! This crate provides the fundamental data types shared by the interpreter:
//! - [`Word`], the 256-bit machine word with wraparound arithmetic
//! - [`Address`], a 20-byte account identifier
//! - [`H256`], a 32-byte hash

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod word;
mod error;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};
pub use word::{Word, WordError};
pub use error::PrimitiveError;

/// Gas type
pub type Gas = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_from_address_roundtrip() {
        let addr = Address::from_bytes([0x42; 20]);
        let word = Word::from(addr);
        assert_eq!(word.to_address(), addr);
    }

    #[test]
    fn test_word_from_hash_roundtrip() {
        let hash = H256::from_bytes([0xAB; 32]);
        let word = Word::from(hash);
        assert_eq!(H256::from(word), hash);
    }
}
