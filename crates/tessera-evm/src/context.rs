//! Execution context for EVM

use tessera_primitives::{Address, H256, Word};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Call context information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CallContext {
    /// Contract address being executed
    pub address: Address,
    /// Caller address
    pub caller: Address,
    /// Call value in wei
    pub value: Word,
    /// Call data
    #[cfg_attr(feature = "serde", serde(with = "hex_bytes"))]
    pub data: Vec<u8>,
    /// Gas limit
    pub gas: u64,
}

impl CallContext {
    /// Create a new call context
    pub fn new(address: Address, caller: Address, value: Word, data: Vec<u8>, gas: u64) -> Self {
        Self {
            address,
            caller,
            value,
            data,
            gas,
        }
    }
}

/// Block environment information
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct BlockContext {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block coinbase (miner/validator)
    pub coinbase: Address,
    /// Block prevrandao
    pub prevrandao: H256,
    /// Chain ID
    pub chain_id: u64,
    /// Base fee (EIP-1559)
    pub base_fee: Word,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            gas_limit: 30_000_000,
            coinbase: Address::ZERO,
            prevrandao: H256::ZERO,
            chain_id: 1,
            base_fee: Word::ZERO,
        }
    }
}

/// Transaction environment information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TxContext {
    /// Transaction origin (original sender)
    pub origin: Address,
    /// Gas price
    pub gas_price: Word,
}

/// Complete execution environment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Environment {
    /// Call context
    pub call: CallContext,
    /// Block context
    pub block: BlockContext,
    /// Transaction context
    pub tx: TxContext,
}

impl Environment {
    /// Create new environment
    pub fn new(call: CallContext, block: BlockContext, tx: TxContext) -> Self {
        Self { call, block, tx }
    }
}

#[cfg(feature = "serde")]
mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_context_new() {
        let address = Address::from_bytes([1u8; 20]);
        let caller = Address::from_bytes([2u8; 20]);
        let ctx = CallContext::new(address, caller, Word::from(1000u64), vec![0xAB], 50_000);

        assert_eq!(ctx.address, address);
        assert_eq!(ctx.caller, caller);
        assert_eq!(ctx.value, Word::from(1000u64));
        assert_eq!(ctx.data, vec![0xAB]);
        assert_eq!(ctx.gas, 50_000);
    }

    #[test]
    fn test_call_context_default() {
        let ctx = CallContext::default();
        assert!(ctx.address.is_zero());
        assert!(ctx.value.is_zero());
        assert!(ctx.data.is_empty());
    }

    #[test]
    fn test_block_context_default() {
        let ctx = BlockContext::default();
        assert_eq!(ctx.number, 0);
        assert_eq!(ctx.gas_limit, 30_000_000);
        assert_eq!(ctx.chain_id, 1);
        assert!(ctx.base_fee.is_zero());
    }

    #[test]
    fn test_environment_new() {
        let block = BlockContext { number: 7, ..Default::default() };
        let env = Environment::new(CallContext::default(), block, TxContext::default());
        assert_eq!(env.block.number, 7);
        assert!(env.tx.origin.is_zero());
    }
}
