//! Capabilities injected into the interpreter

use tessera_primitives::{Address, Word, H256};

/// Read access to the world outside the executing program.
///
/// Only the hash is required. Account and block lookups default to zero
/// values; gas for them is charged whether or not the host answers.
pub trait Host {
    /// Hash behind the `SHA3` opcode
    fn keccak256(&self, data: &[u8]) -> H256;

    /// Balance of `address`
    fn balance(&self, _address: &Address) -> Word {
        Word::ZERO
    }

    /// Code deployed at `address`
    fn code(&self, _address: &Address) -> Vec<u8> {
        Vec::new()
    }

    /// Code size at `address`
    fn code_size(&self, address: &Address) -> usize {
        self.code(address).len()
    }

    /// Code hash at `address`
    fn code_hash(&self, _address: &Address) -> H256 {
        H256::ZERO
    }

    /// Hash of block `number`
    fn block_hash(&self, _number: u64) -> H256 {
        H256::ZERO
    }
}

/// Host with Keccak-256 hashing and an empty world
#[derive(Debug, Clone, Copy, Default)]
pub struct KeccakHost;

impl Host for KeccakHost {
    fn keccak256(&self, data: &[u8]) -> H256 {
        tessera_crypto::keccak256(data)
    }
}
