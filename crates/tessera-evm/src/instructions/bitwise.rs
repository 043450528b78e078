//! 0x10-0x1D: comparison and bitwise logic

use tessera_primitives::Word;

use super::push_and_advance;
use crate::error::EvmResult;
use crate::host::Host;
use crate::state::ExecutionState;

fn binary(state: &mut ExecutionState, op: impl Fn(Word, Word) -> Word) -> EvmResult<()> {
    let [a, b] = state.stack.pop_n()?;
    push_and_advance(state, op(a, b))
}

fn unary(state: &mut ExecutionState, op: impl Fn(Word) -> Word) -> EvmResult<()> {
    let a = state.stack.pop()?;
    push_and_advance(state, op(a))
}

pub(super) fn lt(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| Word::from(a < b))
}

pub(super) fn gt(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| Word::from(a > b))
}

pub(super) fn slt(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| Word::from(a.slt(&b)))
}

pub(super) fn sgt(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| Word::from(a.sgt(&b)))
}

pub(super) fn eq(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| Word::from(a == b))
}

pub(super) fn iszero(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    unary(state, |a| Word::from(a.is_zero()))
}

pub(super) fn and(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| a & b)
}

pub(super) fn or(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| a | b)
}

pub(super) fn xor(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |a, b| a ^ b)
}

pub(super) fn not(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    unary(state, |a| !a)
}

pub(super) fn byte(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |i, x| x.byte(i))
}

pub(super) fn shl(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |shift, value| value.shl(shift))
}

pub(super) fn shr(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |shift, value| value.shr(shift))
}

pub(super) fn sar(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |shift, value| value.sar(shift))
}
