//! SLOAD, SSTORE, TLOAD, TSTORE

use super::push_and_advance;
use crate::error::EvmResult;
use crate::gas::cost;
use crate::host::Host;
use crate::state::ExecutionState;

pub(super) fn sload(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let key = state.stack.peek(0)?;
    let warm = state.storage.is_warm(&key);
    state.gas.deduct(if warm { cost::SLOAD_WARM } else { cost::SLOAD_COLD })?;

    state.stack.pop()?;
    let (was_warm, value) = state.storage.load(key);
    debug_assert_eq!(was_warm, warm);
    push_and_advance(state, value)
}

/// No refunds: clearing a slot costs the same as resetting it
pub(super) fn sstore(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let key = state.stack.peek(0)?;
    let value = state.stack.peek(1)?;

    let current = state.storage.get(&key);
    let write = if value == current {
        0
    } else if current.is_zero() {
        cost::SSTORE_SET
    } else {
        cost::SSTORE_RESET
    };
    let warm = state.storage.is_warm(&key);
    let access = if warm { cost::SLOAD_WARM } else { cost::SLOAD_COLD };
    state.gas.deduct(write + access)?;

    state.stack.pop_n::<2>()?;
    let (was_warm, old) = state.storage.store(key, value);
    debug_assert_eq!((was_warm, old), (warm, current));
    state.pc += 1;
    Ok(())
}

pub(super) fn tload(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let key = state.stack.pop()?;
    let (_, value) = state.transient.load(key);
    push_and_advance(state, value)
}

pub(super) fn tstore(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let [key, value] = state.stack.pop_n()?;
    state.transient.store(key, value);
    state.pc += 1;
    Ok(())
}
