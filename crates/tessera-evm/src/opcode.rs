//! EVM opcode definitions

/// EVM opcodes (see Yellow Paper Appendix H)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // Stop and Arithmetic
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,
    SHL = 0x1B,
    SHR = 0x1C,
    SAR = 0x1D,

    SHA3 = 0x20,

    // Environmental Information
    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3A,
    EXTCODESIZE = 0x3B,
    EXTCODECOPY = 0x3C,
    RETURNDATASIZE = 0x3D,
    RETURNDATACOPY = 0x3E,
    EXTCODEHASH = 0x3F,

    // Block Information
    BLOCKHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    PREVRANDAO = 0x44,
    GASLIMIT = 0x45,
    CHAINID = 0x46,
    SELFBALANCE = 0x47,
    BASEFEE = 0x48,

    // Stack, Memory, Storage and Flow Operations
    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5A,
    JUMPDEST = 0x5B,
    TLOAD = 0x5C,
    TSTORE = 0x5D,

    // Push Operations
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,

    // Dup Operations
    DUP1 = 0x80,
    DUP2 = 0x81,
    DUP3 = 0x82,
    DUP4 = 0x83,
    DUP5 = 0x84,
    DUP6 = 0x85,
    DUP7 = 0x86,
    DUP8 = 0x87,
    DUP9 = 0x88,
    DUP10 = 0x89,
    DUP11 = 0x8A,
    DUP12 = 0x8B,
    DUP13 = 0x8C,
    DUP14 = 0x8D,
    DUP15 = 0x8E,
    DUP16 = 0x8F,

    // Swap Operations
    SWAP1 = 0x90,
    SWAP2 = 0x91,
    SWAP3 = 0x92,
    SWAP4 = 0x93,
    SWAP5 = 0x94,
    SWAP6 = 0x95,
    SWAP7 = 0x96,
    SWAP8 = 0x97,
    SWAP9 = 0x98,
    SWAP10 = 0x99,
    SWAP11 = 0x9A,
    SWAP12 = 0x9B,
    SWAP13 = 0x9C,
    SWAP14 = 0x9D,
    SWAP15 = 0x9E,
    SWAP16 = 0x9F,

    // Logging
    LOG0 = 0xA0,
    LOG1 = 0xA1,
    LOG2 = 0xA2,
    LOG3 = 0xA3,
    LOG4 = 0xA4,

    // System Operations
    CREATE = 0xF0,
    CALL = 0xF1,
    CALLCODE = 0xF2,
    RETURN = 0xF3,
    DELEGATECALL = 0xF4,
    CREATE2 = 0xF5,
    STATICCALL = 0xFA,
    REVERT = 0xFD,
    INVALID = 0xFE,
    SELFDESTRUCT = 0xFF,
}

use Opcode::*;

const PUSHES: [Opcode; 32] = [
    PUSH1, PUSH2, PUSH3, PUSH4, PUSH5, PUSH6, PUSH7, PUSH8,
    PUSH9, PUSH10, PUSH11, PUSH12, PUSH13, PUSH14, PUSH15, PUSH16,
    PUSH17, PUSH18, PUSH19, PUSH20, PUSH21, PUSH22, PUSH23, PUSH24,
    PUSH25, PUSH26, PUSH27, PUSH28, PUSH29, PUSH30, PUSH31, PUSH32,
];

const DUPS: [Opcode; 16] = [
    DUP1, DUP2, DUP3, DUP4, DUP5, DUP6, DUP7, DUP8,
    DUP9, DUP10, DUP11, DUP12, DUP13, DUP14, DUP15, DUP16,
];

const SWAPS: [Opcode; 16] = [
    SWAP1, SWAP2, SWAP3, SWAP4, SWAP5, SWAP6, SWAP7, SWAP8,
    SWAP9, SWAP10, SWAP11, SWAP12, SWAP13, SWAP14, SWAP15, SWAP16,
];

impl Opcode {
    /// Decode a byte. Bytes with no assigned instruction yield `None`.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        let op = match byte {
            0x00 => STOP,
            0x01 => ADD,
            0x02 => MUL,
            0x03 => SUB,
            0x04 => DIV,
            0x05 => SDIV,
            0x06 => MOD,
            0x07 => SMOD,
            0x08 => ADDMOD,
            0x09 => MULMOD,
            0x0A => EXP,
            0x0B => SIGNEXTEND,
            0x10 => LT,
            0x11 => GT,
            0x12 => SLT,
            0x13 => SGT,
            0x14 => EQ,
            0x15 => ISZERO,
            0x16 => AND,
            0x17 => OR,
            0x18 => XOR,
            0x19 => NOT,
            0x1A => BYTE,
            0x1B => SHL,
            0x1C => SHR,
            0x1D => SAR,
            0x20 => SHA3,
            0x30 => ADDRESS,
            0x31 => BALANCE,
            0x32 => ORIGIN,
            0x33 => CALLER,
            0x34 => CALLVALUE,
            0x35 => CALLDATALOAD,
            0x36 => CALLDATASIZE,
            0x37 => CALLDATACOPY,
            0x38 => CODESIZE,
            0x39 => CODECOPY,
            0x3A => GASPRICE,
            0x3B => EXTCODESIZE,
            0x3C => EXTCODECOPY,
            0x3D => RETURNDATASIZE,
            0x3E => RETURNDATACOPY,
            0x3F => EXTCODEHASH,
            0x40 => BLOCKHASH,
            0x41 => COINBASE,
            0x42 => TIMESTAMP,
            0x43 => NUMBER,
            0x44 => PREVRANDAO,
            0x45 => GASLIMIT,
            0x46 => CHAINID,
            0x47 => SELFBALANCE,
            0x48 => BASEFEE,
            0x50 => POP,
            0x51 => MLOAD,
            0x52 => MSTORE,
            0x53 => MSTORE8,
            0x54 => SLOAD,
            0x55 => SSTORE,
            0x56 => JUMP,
            0x57 => JUMPI,
            0x58 => PC,
            0x59 => MSIZE,
            0x5A => GAS,
            0x5B => JUMPDEST,
            0x5C => TLOAD,
            0x5D => TSTORE,
            0x60..=0x7F => PUSHES[(byte - 0x60) as usize],
            0x80..=0x8F => DUPS[(byte - 0x80) as usize],
            0x90..=0x9F => SWAPS[(byte - 0x90) as usize],
            0xA0 => LOG0,
            0xA1 => LOG1,
            0xA2 => LOG2,
            0xA3 => LOG3,
            0xA4 => LOG4,
            0xF0 => CREATE,
            0xF1 => CALL,
            0xF2 => CALLCODE,
            0xF3 => RETURN,
            0xF4 => DELEGATECALL,
            0xF5 => CREATE2,
            0xFA => STATICCALL,
            0xFD => REVERT,
            0xFE => INVALID,
            0xFF => SELFDESTRUCT,
            _ => return None,
        };
        Some(op)
    }

    /// Get PUSH operand size (1-32 for PUSH1-PUSH32, 0 otherwise)
    pub const fn push_size(self) -> usize {
        let byte = self as u8;
        if byte >= 0x60 && byte <= 0x7F {
            (byte - 0x5F) as usize
        } else {
            0
        }
    }

    /// Check if this is a PUSH opcode
    pub const fn is_push(self) -> bool {
        self.push_size() > 0
    }

    /// Get DUP depth (1-16 for DUP1-DUP16, 0 otherwise)
    pub const fn dup_depth(self) -> usize {
        let byte = self as u8;
        if byte >= 0x80 && byte <= 0x8F {
            (byte - 0x7F) as usize
        } else {
            0
        }
    }

    /// Get SWAP depth (1-16 for SWAP1-SWAP16, 0 otherwise)
    pub const fn swap_depth(self) -> usize {
        let byte = self as u8;
        if byte >= 0x90 && byte <= 0x9F {
            (byte - 0x8F) as usize
        } else {
            0
        }
    }

    /// Get LOG topic count (0-4 for LOG0-LOG4, 0 otherwise)
    pub const fn log_topics(self) -> usize {
        let byte = self as u8;
        if byte >= 0xA0 && byte <= 0xA4 {
            (byte - 0xA0) as usize
        } else {
            0
        }
    }

    /// Check if this is a LOG opcode
    pub const fn is_log(self) -> bool {
        let byte = self as u8;
        byte >= 0xA0 && byte <= 0xA4
    }

    /// Calls, creates and self-destruct: decoded but not executed here
    pub const fn is_system_call(self) -> bool {
        matches!(
            self,
            CREATE | CALL | CALLCODE | DELEGATECALL | CREATE2 | STATICCALL | SELFDESTRUCT
        )
    }

    /// Number of stack items consumed and produced
    pub const fn stack_io(self) -> (usize, usize) {
        if self.is_push() {
            return (0, 1);
        }
        let dup = self.dup_depth();
        if dup > 0 {
            return (dup, dup + 1);
        }
        let swap = self.swap_depth();
        if swap > 0 {
            return (swap + 1, swap + 1);
        }
        if self.is_log() {
            return (2 + self.log_topics(), 0);
        }
        match self {
            STOP | JUMPDEST | INVALID => (0, 0),

            ADD | MUL | SUB | DIV | SDIV | MOD | SMOD | EXP | SIGNEXTEND
            | LT | GT | SLT | SGT | EQ | AND | OR | XOR | BYTE | SHL | SHR | SAR
            | SHA3 => (2, 1),

            ADDMOD | MULMOD => (3, 1),

            ISZERO | NOT | BALANCE | CALLDATALOAD | EXTCODESIZE | EXTCODEHASH
            | BLOCKHASH | MLOAD | SLOAD | TLOAD => (1, 1),

            ADDRESS | ORIGIN | CALLER | CALLVALUE | CALLDATASIZE | CODESIZE
            | GASPRICE | RETURNDATASIZE | COINBASE | TIMESTAMP | NUMBER
            | PREVRANDAO | GASLIMIT | CHAINID | SELFBALANCE | BASEFEE | PC
            | MSIZE | GAS => (0, 1),

            CALLDATACOPY | CODECOPY | RETURNDATACOPY => (3, 0),
            EXTCODECOPY => (4, 0),

            POP | JUMP | SELFDESTRUCT => (1, 0),
            MSTORE | MSTORE8 | SSTORE | JUMPI | TSTORE | RETURN | REVERT => (2, 0),

            CREATE => (3, 1),
            CREATE2 => (4, 1),
            CALL | CALLCODE => (7, 1),
            DELEGATECALL | STATICCALL => (6, 1),

            // Push/dup/swap/log handled above
            _ => (0, 0),
        }
    }
}
