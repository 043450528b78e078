//! MLOAD, MSTORE, MSTORE8, MSIZE

use tessera_primitives::Word;

use super::{memory_range, push_and_advance};
use crate::error::EvmResult;
use crate::host::Host;
use crate::state::ExecutionState;

pub(super) fn mload(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let (offset, _, cost) = memory_range(state, state.stack.peek(0)?, Word::from(32u64))?;
    state.gas.deduct(cost)?;
    state.stack.pop()?;
    let value = state.memory.load_word(offset);
    push_and_advance(state, value)
}

pub(super) fn mstore(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let (offset, _, cost) = memory_range(state, state.stack.peek(0)?, Word::from(32u64))?;
    state.gas.deduct(cost)?;
    let [_, value] = state.stack.pop_n()?;
    state.memory.store_word(offset, value);
    state.pc += 1;
    Ok(())
}

pub(super) fn mstore8(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let (offset, _, cost) = memory_range(state, state.stack.peek(0)?, Word::ONE)?;
    state.gas.deduct(cost)?;
    let [_, value] = state.stack.pop_n()?;
    state.memory.store_byte(offset, value);
    state.pc += 1;
    Ok(())
}

pub(super) fn msize(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let size = Word::from(state.memory.size());
    push_and_advance(state, size)
}
