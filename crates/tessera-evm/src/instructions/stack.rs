//! POP, PUSH1-32, DUP1-16, SWAP1-16

use tessera_primitives::Word;

use crate::error::EvmResult;
use crate::host::Host;
use crate::opcode::Opcode;
use crate::state::ExecutionState;

pub(super) fn pop(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    state.stack.pop()?;
    state.pc += 1;
    Ok(())
}

/// Immediates running past the end of the program read as zero
pub(super) fn push(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let n = opcode_at_pc(state).push_size();
    let start = state.pc + 1;
    let available = state.code.len().saturating_sub(start).min(n);

    let mut bytes = [0u8; 32];
    bytes[32 - n..32 - n + available].copy_from_slice(&state.code[start..start + available]);

    state.stack.push(Word::from_be_bytes(bytes))?;
    state.pc += 1 + n;
    Ok(())
}

pub(super) fn dup(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let n = opcode_at_pc(state).dup_depth();
    state.stack.dup(n)?;
    state.pc += 1;
    Ok(())
}

pub(super) fn swap(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let n = opcode_at_pc(state).swap_depth();
    state.stack.swap(n)?;
    state.pc += 1;
    Ok(())
}

fn opcode_at_pc(state: &ExecutionState) -> Opcode {
    Opcode::from_byte(state.current_byte()).unwrap_or(Opcode::STOP)
}
