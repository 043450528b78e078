//! Per-execution machine state

use std::collections::HashSet;

use tessera_primitives::{Address, Word};

use crate::context::{CallContext, Environment, TxContext};
use crate::error::{EvmError, Log, Status};
use crate::gas::GasMeter;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::stack::Stack;
use crate::storage::{PersistentStorage, TransientStorage};

/// Everything one program execution owns.
///
/// Mutated only by instruction handlers while an
/// [`Interpreter`](crate::Interpreter) drives it.
#[derive(Clone, Debug)]
pub struct ExecutionState {
    pub(crate) pc: usize,
    pub(crate) code: Vec<u8>,
    pub(crate) jump_dests: HashSet<usize>,
    pub(crate) stack: Stack,
    pub(crate) memory: Memory,
    pub(crate) storage: PersistentStorage,
    pub(crate) transient: TransientStorage,
    pub(crate) gas: GasMeter,
    pub(crate) env: Environment,
    pub(crate) accessed_addresses: HashSet<Address>,
    pub(crate) stopped: bool,
    pub(crate) reverted: bool,
    pub(crate) fault: Option<(EvmError, usize)>,
    pub(crate) return_data: Vec<u8>,
    /// Output of the last sub-call; always empty since calls are not executed
    pub(crate) call_return_data: Vec<u8>,
    pub(crate) logs: Vec<Log>,
}

impl ExecutionState {
    /// Create state for `program`, with `sender` as both caller and origin
    pub fn new(
        program: Vec<u8>,
        gas_limit: u64,
        value: Word,
        calldata: Vec<u8>,
        sender: Address,
    ) -> Self {
        let env = Environment {
            call: CallContext::new(Address::ZERO, sender, value, calldata, gas_limit),
            tx: TxContext {
                origin: sender,
                ..Default::default()
            },
            ..Default::default()
        };
        Self::with_environment(program, env)
    }

    /// Create state from a full environment. Gas limit is `env.call.gas`.
    pub fn with_environment(program: Vec<u8>, env: Environment) -> Self {
        let jump_dests = analyze_jump_dests(&program);
        Self {
            pc: 0,
            code: program,
            jump_dests,
            stack: Stack::new(),
            memory: Memory::new(),
            storage: PersistentStorage::new(),
            transient: TransientStorage::new(),
            gas: GasMeter::new(env.call.gas),
            env,
            accessed_addresses: HashSet::new(),
            stopped: false,
            reverted: false,
            fault: None,
            return_data: Vec::new(),
            call_return_data: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Reinitialise for another run of the same program and environment
    pub fn reset(&mut self) {
        self.pc = 0;
        self.stack.clear();
        self.memory.clear();
        self.storage.clear();
        self.transient.clear();
        self.gas.reset();
        self.accessed_addresses.clear();
        self.stopped = false;
        self.reverted = false;
        self.fault = None;
        self.return_data.clear();
        self.call_return_data.clear();
        self.logs.clear();
    }

    /// Current machine status
    pub fn status(&self) -> Status {
        if let Some((error, pc)) = &self.fault {
            return Status::Faulted {
                error: error.clone(),
                pc: *pc,
            };
        }
        if self.reverted {
            return Status::Reverted;
        }
        if self.stopped || self.pc >= self.code.len() {
            return Status::Stopped;
        }
        Status::Running
    }

    /// Program counter
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Program bytes
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Operand stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Memory contents
    pub fn memory(&self) -> &[u8] {
        self.memory.data()
    }

    /// Persistent storage
    pub fn storage(&self) -> &PersistentStorage {
        &self.storage
    }

    /// Transient storage
    pub fn transient_storage(&self) -> &TransientStorage {
        &self.transient
    }

    /// Gas meter
    pub fn gas(&self) -> &GasMeter {
        &self.gas
    }

    /// Execution environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// RETURN / REVERT payload
    pub fn return_data(&self) -> &[u8] {
        &self.return_data
    }

    /// Logs emitted so far
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Whether `dest` is a JUMPDEST outside push data
    pub fn is_jump_dest(&self, dest: usize) -> bool {
        self.jump_dests.contains(&dest)
    }

    /// Opcode byte at the program counter
    pub(crate) fn current_byte(&self) -> u8 {
        self.code.get(self.pc).copied().unwrap_or(Opcode::STOP as u8)
    }

    /// Mark `address` accessed, returning whether it already was
    pub(crate) fn touch_address(&mut self, address: Address) -> bool {
        !self.accessed_addresses.insert(address)
    }

    /// Whether `address` has been accessed
    pub(crate) fn is_address_warm(&self, address: &Address) -> bool {
        self.accessed_addresses.contains(address)
    }
}

/// Offsets of JUMPDEST bytes that are not PUSH immediates
fn analyze_jump_dests(code: &[u8]) -> HashSet<usize> {
    let mut dests = HashSet::new();
    let mut i = 0;

    while i < code.len() {
        let opcode = code[i];
        if opcode == Opcode::JUMPDEST as u8 {
            dests.insert(i);
        }
        // Skip PUSH operands
        if let Some(op) = Opcode::from_byte(opcode) {
            i += op.push_size();
        }
        i += 1;
    }

    dests
}
