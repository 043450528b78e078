//! 0x01-0x0B: arithmetic

use tessera_primitives::Word;

use super::push_and_advance;
use crate::error::EvmResult;
use crate::gas;
use crate::host::Host;
use crate::state::ExecutionState;

fn binary(state: &mut ExecutionState, op: impl Fn(Word, Word) -> Word) -> EvmResult<()> {
    let [a, b] = state.stack.pop_n()?;
    push_and_advance(state, op(a, b))
}

fn ternary(state: &mut ExecutionState, op: impl Fn(Word, Word, Word) -> Word) -> EvmResult<()> {
    let [a, b, n] = state.stack.pop_n()?;
    push_and_advance(state, op(a, b, n))
}

pub(super) fn add(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::wrapping_add)
}

pub(super) fn mul(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::wrapping_mul)
}

pub(super) fn sub(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::wrapping_sub)
}

pub(super) fn div(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::div_or_zero)
}

pub(super) fn sdiv(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::sdiv)
}

pub(super) fn rem(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::rem_or_zero)
}

pub(super) fn smod(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, Word::smod)
}

pub(super) fn addmod(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    ternary(state, Word::add_mod)
}

pub(super) fn mulmod(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    ternary(state, Word::mul_mod)
}

pub(super) fn exp(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let exponent = state.stack.peek(1)?;
    state.gas.deduct(gas::exp_gas(exponent.byte_len()))?;
    binary(state, Word::wrapping_pow)
}

pub(super) fn signextend(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    binary(state, |b, x| x.sign_extend(b))
}
