//! # tessera-evm
//!
//! Metered EVM bytecode interpreter.
//!
//! This crate provides:
//! - 256-bit stack, byte-addressable memory and warm/cold tracked storage
//! - A static dispatch table of opcode handlers with stack arity and gas
//! - An [`Interpreter`] that drives one [`ExecutionState`] to completion
//!
//! Call, create and self-destruct instructions fault as unimplemented.
//! World state beyond the executing program is reached through [`Host`].
//!
//! ```
//! use tessera_evm::{ExecutionState, Interpreter, KeccakHost, Status};
//! use tessera_primitives::{Address, Word};
//!
//! // PUSH1 0x42, PUSH1 0xFF, ADD
//! let code = vec![0x60, 0x42, 0x60, 0xFF, 0x01];
//! let state = ExecutionState::new(code, 1000, Word::ZERO, vec![], Address::ZERO);
//! let mut interp = Interpreter::new(state, KeccakHost);
//!
//! let result = interp.run();
//! assert_eq!(result.status, Status::Stopped);
//! assert_eq!(result.gas_used(), 9);
//! assert_eq!(interp.state().stack().peek(0), Ok(Word::from(0x141u64)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod gas;
pub mod host;
pub mod instructions;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod stack;
pub mod state;
pub mod storage;

pub use context::{BlockContext, CallContext, Environment, TxContext};
pub use error::{EvmError, EvmResult, ExecutionResult, Log, Status};
pub use gas::GasMeter;
pub use host::{Host, KeccakHost};
pub use instructions::{Handler, Instruction, INSTRUCTION_TABLE};
pub use interpreter::Interpreter;
pub use memory::{checked_range, ExpansionCost, Memory, QuadraticCost};
pub use opcode::Opcode;
pub use stack::Stack;
pub use state::ExecutionState;
pub use storage::{AccessTracker, PersistentStorage, Storage, TransientStorage, Untracked, WarmKeys};

pub use tessera_primitives::{Address, Word, H256};
