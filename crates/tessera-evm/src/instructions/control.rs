//! STOP, JUMP, JUMPI, PC, GAS, JUMPDEST, RETURN, REVERT and the
//! unimplemented call family

use tessera_primitives::Word;

use super::{memory_range, push_and_advance};
use crate::error::{EvmError, EvmResult};
use crate::host::Host;
use crate::state::ExecutionState;

pub(super) fn stop(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    state.stopped = true;
    Ok(())
}

/// Resolve `dest` to an offset holding a JUMPDEST outside push data
fn jump_target(state: &ExecutionState, dest: Word) -> EvmResult<usize> {
    match dest.to_usize() {
        Some(target) if state.is_jump_dest(target) => Ok(target),
        Some(target) => Err(EvmError::InvalidJumpDestination(target)),
        None => Err(EvmError::InvalidJumpDestination(usize::MAX)),
    }
}

pub(super) fn jump(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let target = jump_target(state, state.stack.peek(0)?)?;
    state.stack.pop()?;
    state.pc = target;
    Ok(())
}

pub(super) fn jumpi(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let condition = state.stack.peek(1)?;
    let next = if condition.is_zero() {
        state.pc + 1
    } else {
        jump_target(state, state.stack.peek(0)?)?
    };
    state.stack.pop_n::<2>()?;
    state.pc = next;
    Ok(())
}

pub(super) fn pc(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let pc = Word::from(state.pc);
    push_and_advance(state, pc)
}

/// Gas left after this instruction's own cost
pub(super) fn gas(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let remaining = Word::from(state.gas.remaining());
    push_and_advance(state, remaining)
}

pub(super) fn jumpdest(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    state.pc += 1;
    Ok(())
}

fn halt_with_output(state: &mut ExecutionState) -> EvmResult<()> {
    let (offset, size, cost) = memory_range(state, state.stack.peek(0)?, state.stack.peek(1)?)?;
    state.gas.deduct(cost)?;
    state.stack.pop_n::<2>()?;
    state.return_data = state.memory.access(offset, size).to_vec();
    state.stopped = true;
    Ok(())
}

pub(super) fn ret(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    halt_with_output(state)
}

/// Only flags the revert; rolling back storage is the caller's concern
pub(super) fn revert(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    halt_with_output(state)?;
    state.reverted = true;
    Ok(())
}

pub(super) fn unimplemented(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    Err(EvmError::UnimplementedOpcode(state.current_byte()))
}
