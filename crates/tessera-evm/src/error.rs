//! EVM error types and execution outcome

use tessera_primitives::{Address, H256};
use thiserror::Error;

/// Faults that terminate execution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Out of gas
    #[error("out of gas")]
    OutOfGas,

    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Jump target out of bounds or not a JUMPDEST
    #[error("invalid jump destination: {0}")]
    InvalidJumpDestination(usize),

    /// Byte with no instruction assigned
    #[error("unknown opcode: 0x{0:02x}")]
    UnknownOpcode(u8),

    /// Call, create or self-destruct instruction
    #[error("unimplemented opcode: 0x{0:02x}")]
    UnimplementedOpcode(u8),

    /// Memory offset or size out of the addressable range
    #[error("invalid memory range")]
    InvalidMemoryRange,
}

impl EvmError {
    /// Variant name, stable across message changes
    pub fn kind(&self) -> &'static str {
        match self {
            EvmError::OutOfGas => "OutOfGas",
            EvmError::StackUnderflow => "StackUnderflow",
            EvmError::StackOverflow => "StackOverflow",
            EvmError::InvalidJumpDestination(_) => "InvalidJumpDestination",
            EvmError::UnknownOpcode(_) => "UnknownOpcode",
            EvmError::UnimplementedOpcode(_) => "UnimplementedOpcode",
            EvmError::InvalidMemoryRange => "InvalidMemoryRange",
        }
    }
}

/// Result type for EVM operations
pub type EvmResult<T> = Result<T, EvmError>;

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// More instructions to execute
    Running,
    /// STOP, RETURN or end of program
    Stopped,
    /// REVERT executed
    Reverted,
    /// Terminated by a fault at `pc`
    Faulted {
        /// Fault kind
        error: EvmError,
        /// Program counter of the faulting instruction
        pc: usize,
    },
}

impl Status {
    /// Anything other than `Running`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// Log entry emitted by LOG opcodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Log {
    /// Contract address that emitted the log
    pub address: Address,
    /// Log topics (0-4)
    pub topics: Vec<H256>,
    /// Log data
    pub data: Vec<u8>,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Final status
    pub status: Status,
    /// Gas the run started with
    pub gas_limit: u64,
    /// Gas left at termination
    pub gas_remaining: u64,
    /// RETURN / REVERT payload
    pub return_data: Vec<u8>,
    /// Logs in emission order
    pub logs: Vec<Log>,
}

impl ExecutionResult {
    /// Gas consumed, including gas spent before a fault
    pub fn gas_used(&self) -> u64 {
        self.gas_limit - self.gas_remaining
    }

    /// Stopped normally
    pub fn is_success(&self) -> bool {
        self.status == Status::Stopped
    }

    /// Ended with REVERT
    pub fn is_reverted(&self) -> bool {
        self.status == Status::Reverted
    }

    /// Fault and its pc, if any
    pub fn fault(&self) -> Option<(&EvmError, usize)> {
        match &self.status {
            Status::Faulted { error, pc } => Some((error, *pc)),
            _ => None,
        }
    }
}
