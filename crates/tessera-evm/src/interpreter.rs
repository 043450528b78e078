//! EVM bytecode interpreter

use crate::error::{EvmError, EvmResult, ExecutionResult, Status};
use crate::gas::cost::MAX_STACK_SIZE;
use crate::host::Host;
use crate::instructions::INSTRUCTION_TABLE;
use crate::state::ExecutionState;

/// Drives one [`ExecutionState`] against one [`Host`]
#[derive(Debug)]
pub struct Interpreter<H: Host> {
    state: ExecutionState,
    host: H,
}

impl<H: Host> Interpreter<H> {
    /// Create an interpreter for `state`
    pub fn new(state: ExecutionState, host: H) -> Self {
        Self { state, host }
    }

    /// Current state
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Mutable state, e.g. to `reset` between runs
    pub fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    /// Injected host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Consume the interpreter, keeping the final state
    pub fn into_state(self) -> ExecutionState {
        self.state
    }

    /// Execute until completion or fault
    pub fn run(&mut self) -> ExecutionResult {
        tracing::debug!(
            "run start: {} bytes, gas limit {}",
            self.state.code.len(),
            self.state.gas.limit()
        );

        let mut status = self.state.status();
        while !status.is_terminal() {
            status = self.step();
        }

        // Transient storage lives for one run only
        self.state.transient.clear();

        let result = ExecutionResult {
            status,
            gas_limit: self.state.gas.limit(),
            gas_remaining: self.state.gas.remaining(),
            return_data: self.state.return_data.clone(),
            logs: self.state.logs.clone(),
        };
        tracing::debug!(
            "run end: {:?}, gas used {}",
            result.status,
            result.gas_used()
        );
        result
    }

    /// Execute a single instruction and report the status it leaves behind.
    ///
    /// A terminal state is returned unchanged. On a fault the pc stays at
    /// the faulting instruction.
    pub fn step(&mut self) -> Status {
        let status = self.state.status();
        if status.is_terminal() {
            return status;
        }

        let pc = self.state.pc;
        let byte = self.state.current_byte();
        if let Err(error) = self.execute(byte) {
            tracing::debug!("fault at pc {}: {}", pc, error);
            self.state.pc = pc;
            self.state.fault = Some((error, pc));
        }
        self.state.status()
    }

    fn execute(&mut self, byte: u8) -> EvmResult<()> {
        let instruction =
            INSTRUCTION_TABLE[byte as usize].ok_or(EvmError::UnknownOpcode(byte))?;

        let depth = self.state.stack.len();
        if depth < instruction.inputs {
            return Err(EvmError::StackUnderflow);
        }
        if depth - instruction.inputs + instruction.outputs > MAX_STACK_SIZE {
            return Err(EvmError::StackOverflow);
        }

        self.state.gas.deduct(instruction.static_gas)?;

        tracing::trace!(
            "pc={} op={:?} gas={}",
            self.state.pc,
            instruction.opcode,
            self.state.gas.remaining()
        );

        (instruction.handler)(&mut self.state, &self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::KeccakHost;
    use tessera_primitives::{Address, Word, H256};

    fn run_code(code: &[u8], gas: u64) -> (ExecutionResult, ExecutionState) {
        let state = ExecutionState::new(code.to_vec(), gas, Word::ZERO, vec![], Address::ZERO);
        let mut interp = Interpreter::new(state, KeccakHost);
        let result = interp.run();
        (result, interp.into_state())
    }

    fn top(state: &ExecutionState) -> Word {
        state.stack().peek(0).unwrap()
    }

    #[test]
    fn test_stop() {
        let (result, _) = run_code(&[0x00], 1000);
        assert!(result.is_success());
        assert_eq!(result.gas_used(), 0);
    }

    #[test]
    fn test_push_add() {
        // PUSH1 0x42, PUSH1 0xFF, ADD
        let (result, state) = run_code(&[0x60, 0x42, 0x60, 0xFF, 0x01], 1000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::from(0x141u64));
        assert_eq!(result.gas_used(), 9);
    }

    #[test]
    fn test_div_by_zero() {
        // PUSH1 0, PUSH1 0, DIV
        let (result, state) = run_code(&[0x60, 0x00, 0x60, 0x00, 0x04], 1000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::ZERO);
    }

    #[test]
    fn test_sdiv_negative() {
        // PUSH1 3, PUSH1 8, PUSH1 0, SUB, SDIV -> -8 / 3
        let code = [0x60, 0x03, 0x60, 0x08, 0x60, 0x00, 0x03, 0x05];
        let (result, state) = run_code(&code, 1000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::from_i64(-2));
    }

    #[test]
    fn test_exp_charges_per_exponent_byte() {
        // PUSH1 10, PUSH1 2, EXP
        let (result, state) = run_code(&[0x60, 0x0A, 0x60, 0x02, 0x0A], 1000);
        assert_eq!(top(&state), Word::from(1024u64));
        assert_eq!(result.gas_used(), 3 + 3 + 10 + 50);
    }

    #[test]
    fn test_push_past_end_is_padded() {
        // PUSH2 0xAB, program ends
        let (result, state) = run_code(&[0x61, 0xAB], 1000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::from(0xAB00u64));
        assert_eq!(state.pc(), 3);
    }

    #[test]
    fn test_jump() {
        // PUSH1 4, JUMP, INVALID, JUMPDEST, STOP
        let (result, _) = run_code(&[0x60, 0x04, 0x56, 0xFE, 0x5B, 0x00], 1000);
        assert!(result.is_success());
        assert_eq!(result.gas_used(), 3 + 8 + 1);
    }

    #[test]
    fn test_jumpi_taken() {
        // PUSH1 1, PUSH1 7, JUMPI, INVALID, INVALID, INVALID, JUMPDEST, STOP
        let code = [0x60, 0x01, 0x60, 0x07, 0x57, 0xFE, 0xFE, 0x5B, 0x00];
        let (result, _) = run_code(&code, 1000);
        assert!(result.is_success());
    }

    #[test]
    fn test_jumpi_not_taken() {
        // PUSH1 0, PUSH1 6, JUMPI, STOP, INVALID, JUMPDEST
        let code = [0x60, 0x00, 0x60, 0x06, 0x57, 0x00, 0xFE];
        let (result, state) = run_code(&code, 1000);
        assert!(result.is_success());
        assert_eq!(state.pc(), 5);
        assert!(state.stack().is_empty());
    }

    #[test]
    fn test_invalid_jump_keeps_pc() {
        // PUSH1 5, JUMP
        let (result, state) = run_code(&[0x60, 0x05, 0x56], 1000);
        assert_eq!(
            result.fault(),
            Some((&EvmError::InvalidJumpDestination(5), 2))
        );
        assert_eq!(state.pc(), 2);
        assert_eq!(state.stack().len(), 1);
        assert_eq!(result.gas_remaining, 1000 - 3 - 8);
    }

    #[test]
    fn test_jump_into_push_data() {
        // PUSH1 3, JUMP, PUSH1 0x5B
        let (result, _) = run_code(&[0x60, 0x03, 0x56, 0x60, 0x5B], 1000);
        assert_eq!(
            result.fault().map(|(e, _)| e.clone()),
            Some(EvmError::InvalidJumpDestination(3))
        );
    }

    #[test]
    fn test_mstore_mload() {
        // PUSH1 42, PUSH1 0, MSTORE, PUSH1 0, MLOAD
        let code = [0x60, 0x2A, 0x60, 0x00, 0x52, 0x60, 0x00, 0x51];
        let (result, state) = run_code(&code, 10_000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::from(42u64));
        assert_eq!(state.memory().len(), 32);
        // one word of expansion, paid once
        assert_eq!(result.gas_used(), 3 + 3 + 3 + 3 + 3 + 3);
    }

    #[test]
    fn test_mstore8_and_msize() {
        // PUSH1 0xAA, PUSH1 33, MSTORE8, MSIZE
        let code = [0x60, 0xAA, 0x60, 0x21, 0x53, 0x59];
        let (_, state) = run_code(&code, 10_000);
        assert_eq!(state.memory()[33], 0xAA);
        assert_eq!(top(&state), Word::from(64u64));
    }

    #[test]
    fn test_out_of_gas_is_atomic() {
        // PUSH1 1, PUSH1 0, MSTORE with gas for the static part only
        let code = [0x60, 0x01, 0x60, 0x00, 0x52];
        let (result, state) = run_code(&code, 11);
        assert_eq!(result.fault(), Some((&EvmError::OutOfGas, 4)));
        assert_eq!(result.gas_remaining, 2);
        assert_eq!(state.stack().len(), 2);
        assert!(state.memory().is_empty());
        assert_eq!(state.pc(), 4);
    }

    #[test]
    fn test_out_of_gas_on_static_cost() {
        let (result, state) = run_code(&[0x60, 0x01], 2);
        assert_eq!(result.fault(), Some((&EvmError::OutOfGas, 0)));
        assert_eq!(result.gas_remaining, 2);
        assert!(state.stack().is_empty());
    }

    #[test]
    fn test_stack_underflow_charges_nothing() {
        let (result, _) = run_code(&[0x01], 100);
        assert_eq!(result.fault(), Some((&EvmError::StackUnderflow, 0)));
        assert_eq!(result.gas_remaining, 100);
    }

    #[test]
    fn test_stack_overflow() {
        // 1025 x PC
        let code = vec![0x58; 1025];
        let (result, state) = run_code(&code, 10_000);
        assert_eq!(result.fault(), Some((&EvmError::StackOverflow, 1024)));
        assert_eq!(state.stack().len(), 1024);
    }

    #[test]
    fn test_unknown_and_unimplemented() {
        let (result, _) = run_code(&[0xFE], 100);
        assert_eq!(result.fault(), Some((&EvmError::UnknownOpcode(0xFE), 0)));

        let (result, _) = run_code(&[0x0C], 100);
        assert_eq!(result.fault(), Some((&EvmError::UnknownOpcode(0x0C), 0)));

        let (result, _) = run_code(&[0xF1], 100);
        assert_eq!(
            result.fault(),
            Some((&EvmError::UnimplementedOpcode(0xF1), 0))
        );
    }

    #[test]
    fn test_sstore_then_sload() {
        // PUSH1 5, PUSH1 1, SSTORE, PUSH1 1, SLOAD
        let code = [0x60, 0x05, 0x60, 0x01, 0x55, 0x60, 0x01, 0x54];
        let (result, state) = run_code(&code, 100_000);
        assert!(result.is_success());
        assert_eq!(top(&state), Word::from(5u64));
        assert_eq!(result.gas_used(), 3 + 3 + 22_100 + 3 + 100);
        assert_eq!(state.storage().get(&Word::ONE), Word::from(5u64));
    }

    #[test]
    fn test_warm_slot_pricing() {
        // PUSH1 5, PUSH1 1, SSTORE, PUSH1 7, PUSH1 1, SSTORE,
        // PUSH1 1, SLOAD, PUSH1 1, SLOAD
        let code = [
            0x60, 0x05, 0x60, 0x01, 0x55, 0x60, 0x07, 0x60, 0x01, 0x55, 0x60, 0x01, 0x54, 0x60,
            0x01, 0x54,
        ];
        let (result, state) = run_code(&code, 100_000);
        assert!(result.is_success());
        assert_eq!(state.stack().as_slice(), &[Word::from(7u64), Word::from(7u64)]);
        assert_eq!(
            result.gas_used(),
            3 + 3 + 22_100 + 3 + 3 + 2900 + 100 + 3 + 100 + 3 + 100
        );
    }

    #[test]
    fn test_cold_sload_then_warm() {
        // PUSH1 9, SLOAD, PUSH1 9, SLOAD
        let (result, state) = run_code(&[0x60, 0x09, 0x54, 0x60, 0x09, 0x54], 10_000);
        assert_eq!(state.stack().as_slice(), &[Word::ZERO, Word::ZERO]);
        assert!(state.storage().is_warm(&Word::from(9u64)));
        assert_eq!(result.gas_used(), 3 + 2100 + 3 + 100);
    }

    #[test]
    fn test_codecopy_pads_past_end() {
        // PUSH1 8, PUSH1 6, PUSH1 0, CODECOPY, STOP
        let code = [0x60, 0x08, 0x60, 0x06, 0x60, 0x00, 0x39, 0x00];
        let (result, state) = run_code(&code, 1000);
        assert!(result.is_success());
        assert_eq!(&state.memory()[..8], &[0x39, 0x00, 0, 0, 0, 0, 0, 0]);
        assert_eq!(state.memory().len(), 32);
        assert_eq!(result.gas_used(), 3 + 3 + 3 + 3 + 3 + 3);
    }

    #[test]
    fn test_calldatacopy_offset() {
        // PUSH1 4, PUSH1 2, PUSH1 0, CALLDATACOPY
        let code = vec![0x60, 0x04, 0x60, 0x02, 0x60, 0x00, 0x37];
        let data = vec![0x11, 0x22, 0x33, 0x44, 0x55];
        let state = ExecutionState::new(code, 1000, Word::ZERO, data, Address::ZERO);
        let mut interp = Interpreter::new(state, KeccakHost);
        let result = interp.run();
        assert!(result.is_success());
        assert_eq!(&interp.state().memory()[..4], &[0x33, 0x44, 0x55, 0x00]);
        assert!(interp.state().memory()[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_sstore_same_value_costs_access_only() {
        // PUSH1 0, PUSH1 1, SSTORE
        let (result, _) = run_code(&[0x60, 0x00, 0x60, 0x01, 0x55], 100_000);
        assert_eq!(result.gas_used(), 3 + 3 + 2100);
    }

    #[test]
    fn test_transient_storage_cleared_after_run() {
        // PUSH1 5, PUSH1 1, TSTORE, PUSH1 1, TLOAD
        let code = [0x60, 0x05, 0x60, 0x01, 0x5D, 0x60, 0x01, 0x5C];
        let (result, state) = run_code(&code, 1000);
        assert_eq!(top(&state), Word::from(5u64));
        assert_eq!(result.gas_used(), 3 + 3 + 100 + 3 + 100);
        assert!(state.transient_storage().is_empty());
    }

    #[test]
    fn test_return() {
        // PUSH1 4, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, RETURN
        let code = [0x60, 0x04, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3];
        let (result, _) = run_code(&code, 10_000);
        assert!(result.is_success());
        assert_eq!(result.return_data.len(), 32);
        assert_eq!(result.return_data[31], 4);
    }

    #[test]
    fn test_revert() {
        // PUSH1 0x2A, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, REVERT
        let code = [0x60, 0x2A, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xFD];
        let (result, _) = run_code(&code, 10_000);
        assert!(result.is_reverted());
        assert!(result.fault().is_none());
        assert_eq!(result.return_data[31], 0x2A);
    }

    #[test]
    fn test_sha3_empty() {
        // PUSH1 0, PUSH1 0, SHA3
        let (result, state) = run_code(&[0x60, 0x00, 0x60, 0x00, 0x20], 1000);
        let expected =
            H256::from_hex("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                .unwrap();
        assert_eq!(top(&state), Word::from(expected));
        assert_eq!(result.gas_used(), 3 + 3 + 30);
    }

    #[test]
    fn test_log1() {
        // PUSH1 0xAA, PUSH1 0, MSTORE8, PUSH1 7, PUSH1 1, PUSH1 0, LOG1
        let code = [
            0x60, 0xAA, 0x60, 0x00, 0x53, 0x60, 0x07, 0x60, 0x01, 0x60, 0x00, 0xA1,
        ];
        let (result, _) = run_code(&code, 10_000);
        assert!(result.is_success());
        assert_eq!(result.logs.len(), 1);
        let log = &result.logs[0];
        assert_eq!(log.address, Address::ZERO);
        assert_eq!(log.topics, vec![H256::from(Word::from(7u64))]);
        assert_eq!(log.data, vec![0xAA]);
        assert_eq!(result.gas_used(), 3 + 3 + 3 + 3 + 3 + 3 + 3 + 375 + 375 + 8);
    }

    #[test]
    fn test_balance_cold_then_warm() {
        // PUSH1 0, BALANCE, PUSH1 0, BALANCE
        let (result, _) = run_code(&[0x60, 0x00, 0x31, 0x60, 0x00, 0x31], 10_000);
        assert!(result.is_success());
        assert_eq!(result.gas_used(), 3 + 2600 + 3 + 100);
    }

    #[test]
    fn test_gas_opcode() {
        let (_, state) = run_code(&[0x5A], 100);
        assert_eq!(top(&state), Word::from(98u64));
    }

    #[test]
    fn test_step_by_step() {
        let state = ExecutionState::new(
            vec![0x60, 0x01, 0x60, 0x02, 0x01],
            100,
            Word::ZERO,
            vec![],
            Address::ZERO,
        );
        let mut interp = Interpreter::new(state, KeccakHost);

        assert_eq!(interp.step(), Status::Running);
        assert_eq!(interp.state().pc(), 2);
        assert_eq!(interp.step(), Status::Running);
        assert_eq!(interp.step(), Status::Stopped);
        assert_eq!(top(interp.state()), Word::from(3u64));
        // terminal states are sticky
        assert_eq!(interp.step(), Status::Stopped);
        assert_eq!(interp.state().gas().used(), 9);
    }

    #[test]
    fn test_reset_and_rerun() {
        let code = [0x60, 0x05, 0x60, 0x01, 0x55];
        let state = ExecutionState::new(code.to_vec(), 50_000, Word::ZERO, vec![], Address::ZERO);
        let mut interp = Interpreter::new(state, KeccakHost);

        let first = interp.run();
        interp.state_mut().reset();
        let second = interp.run();

        assert_eq!(first, second);
        assert_eq!(second.gas_used(), 3 + 3 + 22_100);
    }
}
