//! Type definitions for the fixture JSON format

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use tessera_evm::Environment;
use tessera_primitives::{Address, Word, H256};

/// Hex-encoded bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexBytes(Vec::new()));
        }
        hex::decode(s)
            .map(HexBytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Hex-encoded u64
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexU64(pub u64);

impl<'de> Deserialize<'de> for HexU64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexU64(0));
        }
        u64::from_str_radix(s, 16)
            .map(HexU64)
            .map_err(serde::de::Error::custom)
    }
}

/// Fixture file structure (map of test name -> test case)
pub type VmTestFile = BTreeMap<String, VmTestCase>;

/// Single fixture
#[derive(Debug, Deserialize)]
pub struct VmTestCase {
    /// Block and transaction context; call fields come from `exec`
    #[serde(default)]
    pub env: Option<Environment>,
    /// Execution inputs
    pub exec: VmExec,
    /// Expected outcome
    pub expect: VmExpect,
}

/// Execution inputs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmExec {
    /// Program bytes
    pub code: HexBytes,
    /// Gas limit
    pub gas: HexU64,
    /// Call value
    #[serde(default)]
    pub value: Word,
    /// Calldata
    #[serde(default)]
    pub data: HexBytes,
    /// Caller, also used as origin when `env` has none
    #[serde(default)]
    pub caller: Address,
    /// Executing address
    #[serde(default)]
    pub address: Address,
}

/// Final status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedStatus {
    /// STOP, RETURN or end of program
    Stopped,
    /// REVERT
    Reverted,
    /// Any fault
    Faulted,
}

/// Expected outcome; absent fields are not checked
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmExpect {
    /// Final status
    pub status: ExpectedStatus,
    /// Fault kind, e.g. `"OutOfGas"`
    pub fault: Option<String>,
    /// Program counter of the fault
    pub fault_pc: Option<usize>,
    /// Gas left at the end
    pub gas_remaining: Option<HexU64>,
    /// Final stack, bottom first
    pub stack: Option<Vec<Word>>,
    /// RETURN / REVERT payload
    pub out: Option<HexBytes>,
    /// Non-zero storage slots after the run
    pub storage: Option<BTreeMap<Word, Word>>,
    /// Logs in emission order
    pub logs: Option<Vec<ExpectedLog>>,
}

/// Expected log entry
#[derive(Debug, Deserialize)]
pub struct ExpectedLog {
    /// Emitting address; not checked when absent
    pub address: Option<Address>,
    /// Topics
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Data
    #[serde(default)]
    pub data: HexBytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_case() {
        let json = r#"{
            "exec": { "code": "0x604260ff01", "gas": "0x64" },
            "expect": { "status": "stopped", "stack": ["0x141"], "gasRemaining": "0x5b" }
        }"#;
        let case: VmTestCase = serde_json::from_str(json).unwrap();

        assert!(case.env.is_none());
        assert_eq!(case.exec.code.0, vec![0x60, 0x42, 0x60, 0xFF, 0x01]);
        assert_eq!(case.exec.gas.0, 100);
        assert_eq!(case.exec.value, Word::ZERO);
        assert!(case.exec.data.0.is_empty());
        assert_eq!(case.expect.status, ExpectedStatus::Stopped);
        assert_eq!(case.expect.stack, Some(vec![Word::from(0x141u64)]));
        assert_eq!(case.expect.gas_remaining, Some(HexU64(91)));
        assert!(case.expect.fault.is_none());
    }

    #[test]
    fn test_parse_storage_and_logs() {
        let json = r#"{
            "status": "faulted",
            "fault": "OutOfGas",
            "storage": { "0x01": "0x05" },
            "logs": [ { "topics": ["0x0000000000000000000000000000000000000000000000000000000000000007"], "data": "0xaa" } ]
        }"#;
        let expect: VmExpect = serde_json::from_str(json).unwrap();

        assert_eq!(expect.status, ExpectedStatus::Faulted);
        assert_eq!(expect.fault.as_deref(), Some("OutOfGas"));
        let storage = expect.storage.unwrap();
        assert_eq!(storage.get(&Word::ONE), Some(&Word::from(5u64)));
        let logs = expect.logs.unwrap();
        assert_eq!(logs[0].topics, vec![H256::from(Word::from(7u64))]);
        assert_eq!(logs[0].data.0, vec![0xAA]);
        assert!(logs[0].address.is_none());
    }

    #[test]
    fn test_bad_hex_rejected() {
        let result: Result<HexBytes, _> = serde_json::from_str("\"0xzz\"");
        assert!(result.is_err());
        let result: Result<HexU64, _> = serde_json::from_str("\"0xnothex\"");
        assert!(result.is_err());
    }
}
