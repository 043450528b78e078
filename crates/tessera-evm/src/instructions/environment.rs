//! 0x20 SHA3, 0x30-0x3F environment and 0x40-0x48 block information

use tessera_primitives::Word;

use super::{account_access_cost, memory_range, padded_slice, push_and_advance};
use crate::error::{EvmError, EvmResult};
use crate::gas;
use crate::host::Host;
use crate::state::ExecutionState;

pub(super) fn sha3(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let (offset, size, expansion) =
        memory_range(state, state.stack.peek(0)?, state.stack.peek(1)?)?;
    state.gas.deduct(gas::sha3_word_gas(size).saturating_add(expansion))?;
    state.stack.pop_n::<2>()?;

    let hash = host.keccak256(state.memory.access(offset, size));
    push_and_advance(state, Word::from(hash))
}

// ==================== Call context ====================

pub(super) fn address(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.call.address);
    push_and_advance(state, value)
}

pub(super) fn balance(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let address = state.stack.peek(0)?.to_address();
    let cost = account_access_cost(state, &address);
    state.gas.deduct(cost)?;
    state.stack.pop()?;
    state.touch_address(address);
    push_and_advance(state, host.balance(&address))
}

pub(super) fn origin(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.tx.origin);
    push_and_advance(state, value)
}

pub(super) fn caller(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.call.caller);
    push_and_advance(state, value)
}

pub(super) fn callvalue(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = state.env.call.value;
    push_and_advance(state, value)
}

pub(super) fn calldataload(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let offset = state.stack.pop()?;
    let bytes = padded_slice(&state.env.call.data, offset, 32);
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes);
    push_and_advance(state, Word::from_be_bytes(word))
}

pub(super) fn calldatasize(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let size = Word::from(state.env.call.data.len());
    push_and_advance(state, size)
}

/// Shared body of the copy instructions: `[dest, offset, size]` on top of
/// the stack, `extra` already-priced gas, and `read(state, offset, size)`
/// producing the zero-padded bytes.
fn copy_to_memory(
    state: &mut ExecutionState,
    read: impl FnOnce(&ExecutionState, Word, usize) -> Vec<u8>,
    extra: u64,
    depth: usize,
) -> EvmResult<()> {
    let dest = state.stack.peek(depth)?;
    let src_offset = state.stack.peek(depth + 1)?;
    let (dest, size, expansion) = memory_range(state, dest, state.stack.peek(depth + 2)?)?;
    let cost = gas::copy_gas(size).saturating_add(expansion).saturating_add(extra);
    state.gas.deduct(cost)?;

    let data = read(&*state, src_offset, size);
    for _ in 0..depth + 3 {
        state.stack.pop()?;
    }
    state.memory.store(dest, &data);
    state.pc += 1;
    Ok(())
}

pub(super) fn calldatacopy(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    copy_to_memory(state, |s, offset, size| padded_slice(&s.env.call.data, offset, size), 0, 0)
}

pub(super) fn codesize(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let size = Word::from(state.code.len());
    push_and_advance(state, size)
}

pub(super) fn codecopy(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    copy_to_memory(state, |s, offset, size| padded_slice(&s.code, offset, size), 0, 0)
}

pub(super) fn gasprice(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let price = state.env.tx.gas_price;
    push_and_advance(state, price)
}

pub(super) fn extcodesize(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let address = state.stack.peek(0)?.to_address();
    let cost = account_access_cost(state, &address);
    state.gas.deduct(cost)?;
    state.stack.pop()?;
    state.touch_address(address);
    push_and_advance(state, Word::from(host.code_size(&address)))
}

pub(super) fn extcodecopy(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let address = state.stack.peek(0)?.to_address();
    let access = account_access_cost(state, &address);
    copy_to_memory(
        state,
        |_, offset, size| padded_slice(&host.code(&address), offset, size),
        access,
        1,
    )?;
    state.touch_address(address);
    Ok(())
}

pub(super) fn returndatasize(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let size = Word::from(state.call_return_data.len());
    push_and_advance(state, size)
}

pub(super) fn returndatacopy(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    // Reading past the return buffer is a fault, not zero padding
    let offset = state.stack.peek(1)?;
    let size = state.stack.peek(2)?;
    let end = offset
        .to_u64()
        .zip(size.to_u64())
        .and_then(|(o, s)| o.checked_add(s));
    match end {
        Some(end) if end <= state.call_return_data.len() as u64 => {}
        _ => return Err(EvmError::InvalidMemoryRange),
    }
    copy_to_memory(
        state,
        |s, offset, size| padded_slice(&s.call_return_data, offset, size),
        0,
        0,
    )
}

pub(super) fn extcodehash(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let address = state.stack.peek(0)?.to_address();
    let cost = account_access_cost(state, &address);
    state.gas.deduct(cost)?;
    state.stack.pop()?;
    state.touch_address(address);
    push_and_advance(state, Word::from(host.code_hash(&address)))
}

// ==================== Block information ====================

pub(super) fn blockhash(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let requested = state.stack.pop()?;
    let current = state.env.block.number;

    // Only the 256 most recent complete blocks are visible
    let hash = match requested.to_u64() {
        Some(n) if n < current && current - n <= 256 => Word::from(host.block_hash(n)),
        _ => Word::ZERO,
    };
    push_and_advance(state, hash)
}

pub(super) fn coinbase(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.coinbase);
    push_and_advance(state, value)
}

pub(super) fn timestamp(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.timestamp);
    push_and_advance(state, value)
}

pub(super) fn number(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.number);
    push_and_advance(state, value)
}

pub(super) fn prevrandao(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.prevrandao);
    push_and_advance(state, value)
}

pub(super) fn gaslimit(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.gas_limit);
    push_and_advance(state, value)
}

pub(super) fn chainid(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = Word::from(state.env.block.chain_id);
    push_and_advance(state, value)
}

pub(super) fn selfbalance(state: &mut ExecutionState, host: &dyn Host) -> EvmResult<()> {
    let value = host.balance(&state.env.call.address);
    push_and_advance(state, value)
}

pub(super) fn basefee(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let value = state.env.block.base_fee;
    push_and_advance(state, value)
}
