//! Gas costs and metering

use crate::error::{EvmError, EvmResult};
use crate::opcode::Opcode;

/// Gas costs for EVM operations
pub mod cost {
    /// Zero gas
    pub const ZERO: u64 = 0;
    /// Base gas
    pub const BASE: u64 = 2;
    /// Very low gas
    pub const VERYLOW: u64 = 3;
    /// Low gas
    pub const LOW: u64 = 5;
    /// Mid gas
    pub const MID: u64 = 8;
    /// High gas
    pub const HIGH: u64 = 10;

    /// Jump dest gas
    pub const JUMPDEST: u64 = 1;
    /// Exp gas
    pub const EXP: u64 = 10;
    /// Exp byte gas
    pub const EXP_BYTE: u64 = 50;
    /// SHA3 base gas
    pub const SHA3: u64 = 30;
    /// SHA3 word gas
    pub const SHA3_WORD: u64 = 6;
    /// Copy gas per word
    pub const COPY: u64 = 3;
    /// Memory gas per word
    pub const MEMORY: u64 = 3;
    /// Quadratic memory divisor
    pub const MEMORY_QUAD_DIVISOR: u64 = 512;
    /// Blockhash gas
    pub const BLOCKHASH: u64 = 20;

    /// Account access (EIP-2929 cold)
    pub const ACCOUNT_COLD: u64 = 2600;
    /// Account access (warm)
    pub const ACCOUNT_WARM: u64 = 100;

    /// Sload gas (cold)
    pub const SLOAD_COLD: u64 = 2100;
    /// Sload gas (warm)
    pub const SLOAD_WARM: u64 = 100;
    /// Sstore set gas
    pub const SSTORE_SET: u64 = 20000;
    /// Sstore reset gas
    pub const SSTORE_RESET: u64 = 2900;
    /// Transient storage access
    pub const TRANSIENT: u64 = 100;

    /// Log gas
    pub const LOG: u64 = 375;
    /// Log topic gas
    pub const LOG_TOPIC: u64 = 375;
    /// Log data gas (per byte)
    pub const LOG_DATA: u64 = 8;

    /// Max stack size
    pub const MAX_STACK_SIZE: usize = 1024;
}

/// Static gas charged before an instruction runs.
///
/// Instructions with a dynamic component (memory expansion, storage warmth,
/// account access, exponent size) charge the rest from their handler.
pub const fn static_gas(opcode: Opcode) -> u64 {
    use Opcode::*;

    if opcode.is_push() || opcode.dup_depth() > 0 || opcode.swap_depth() > 0 {
        return cost::VERYLOW;
    }
    if opcode.is_log() {
        return cost::LOG + cost::LOG_TOPIC * opcode.log_topics() as u64;
    }

    match opcode {
        // Zero cost; dynamic parts charged by the handler
        STOP | RETURN | REVERT | SLOAD | SSTORE | BALANCE | EXTCODESIZE
        | EXTCODECOPY | EXTCODEHASH | INVALID => cost::ZERO,

        // Base cost (2)
        ADDRESS | ORIGIN | CALLER | CALLVALUE | CALLDATASIZE | CODESIZE | GASPRICE
        | COINBASE | TIMESTAMP | NUMBER | PREVRANDAO | GASLIMIT | CHAINID
        | RETURNDATASIZE | POP | PC | MSIZE | GAS | BASEFEE => cost::BASE,

        // Very low cost (3)
        ADD | SUB | NOT | LT | GT | SLT | SGT | EQ | ISZERO | AND | OR | XOR | BYTE
        | SHL | SHR | SAR | CALLDATALOAD | MLOAD | MSTORE | MSTORE8 | CALLDATACOPY
        | CODECOPY | RETURNDATACOPY => cost::VERYLOW,

        // Low cost (5)
        MUL | DIV | SDIV | MOD | SMOD | SIGNEXTEND | SELFBALANCE => cost::LOW,

        // Mid cost (8)
        ADDMOD | MULMOD | JUMP => cost::MID,

        // High cost (10)
        JUMPI => cost::HIGH,

        JUMPDEST => cost::JUMPDEST,
        EXP => cost::EXP,
        SHA3 => cost::SHA3,
        BLOCKHASH => cost::BLOCKHASH,
        TLOAD | TSTORE => cost::TRANSIENT,

        // Not executed by this interpreter
        CREATE | CALL | CALLCODE | DELEGATECALL | CREATE2 | STATICCALL
        | SELFDESTRUCT => cost::ZERO,

        // Push/dup/swap/log handled above
        _ => cost::ZERO,
    }
}

/// Total cost of a memory of `words` 32-byte words: `3w + w²/512`, with the
/// quadratic term rounded to nearest and ties to even
pub fn memory_word_cost(words: u64) -> u64 {
    let square = words.saturating_mul(words);
    let mut quad = square / cost::MEMORY_QUAD_DIVISOR;
    // An exact half only occurs with an even quotient, so ties round down
    if square % cost::MEMORY_QUAD_DIVISOR > cost::MEMORY_QUAD_DIVISOR / 2 {
        quad += 1;
    }
    cost::MEMORY.saturating_mul(words).saturating_add(quad)
}

/// Per-word copy cost (CALLDATACOPY, CODECOPY, RETURNDATACOPY, EXTCODECOPY)
pub fn copy_gas(length: usize) -> u64 {
    cost::COPY * length.div_ceil(32) as u64
}

/// Dynamic EXP cost: 50 per exponent byte, a zero exponent counting as one byte
pub fn exp_gas(exponent_bytes: usize) -> u64 {
    cost::EXP_BYTE * exponent_bytes.max(1) as u64
}

/// Per-word SHA3 cost
pub fn sha3_word_gas(length: usize) -> u64 {
    cost::SHA3_WORD * length.div_ceil(32) as u64
}

/// Per-byte LOG data cost
pub fn log_data_gas(length: usize) -> u64 {
    cost::LOG_DATA * length as u64
}

/// Gas meter for one execution.
///
/// The balance only decreases; a failed deduction leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    remaining: u64,
}

impl GasMeter {
    /// Create a meter holding `limit` gas
    pub fn new(limit: u64) -> Self {
        Self { limit, remaining: limit }
    }

    /// Charge `amount`, failing with `OutOfGas` if the balance is short
    pub fn deduct(&mut self, amount: u64) -> EvmResult<()> {
        if amount > self.remaining {
            return Err(EvmError::OutOfGas);
        }
        self.remaining -= amount;
        Ok(())
    }

    /// Gas left
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas spent so far
    pub fn used(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Starting balance
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Refill to the original limit
    pub fn reset(&mut self) {
        self.remaining = self.limit;
    }
}
