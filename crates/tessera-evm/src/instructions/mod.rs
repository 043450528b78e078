//! Static dispatch table: opcode byte to handler, stack arity and static gas
//!
//! Handlers run after the interpreter has checked stack arity and charged
//! static gas. A handler that has dynamic cost validates its operands and
//! charges that cost before it pops anything, so a fault leaves the stack,
//! memory, storage and pc as they were. Every handler advances the pc itself.

mod arithmetic;
mod bitwise;
mod control;
mod environment;
mod log;
mod memory;
mod stack;
mod storage;

use tessera_primitives::{Address, Word};

use crate::error::EvmResult;
use crate::gas::{cost, static_gas};
use crate::host::Host;
use crate::memory::checked_range;
use crate::opcode::Opcode;
use crate::state::ExecutionState;

/// Instruction implementation
pub type Handler = fn(&mut ExecutionState, &dyn Host) -> EvmResult<()>;

/// Dispatch table entry
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
    /// Decoded opcode
    pub opcode: Opcode,
    /// Implementation
    pub handler: Handler,
    /// Stack items consumed
    pub inputs: usize,
    /// Stack items produced
    pub outputs: usize,
    /// Gas charged before the handler runs
    pub static_gas: u64,
}

/// One entry per byte; `None` marks bytes with no executable instruction
pub static INSTRUCTION_TABLE: [Option<Instruction>; 256] = build_table();

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table: [Option<Instruction>; 256] = [None; 256];
    let mut byte = 0;
    while byte < 256 {
        if let Some(opcode) = Opcode::from_byte(byte as u8) {
            if !matches!(opcode, Opcode::INVALID) {
                // System calls fault before touching the stack
                let (inputs, outputs) = if opcode.is_system_call() {
                    (0, 0)
                } else {
                    opcode.stack_io()
                };
                table[byte] = Some(Instruction {
                    opcode,
                    handler: handler_for(opcode),
                    inputs,
                    outputs,
                    static_gas: static_gas(opcode),
                });
            }
        }
        byte += 1;
    }
    table
}

const fn handler_for(opcode: Opcode) -> Handler {
    use Opcode::*;

    if opcode.is_push() {
        return stack::push;
    }
    if opcode.dup_depth() > 0 {
        return stack::dup;
    }
    if opcode.swap_depth() > 0 {
        return stack::swap;
    }
    if opcode.is_log() {
        return log::log;
    }
    if opcode.is_system_call() {
        return control::unimplemented;
    }

    match opcode {
        STOP => control::stop,
        ADD => arithmetic::add,
        MUL => arithmetic::mul,
        SUB => arithmetic::sub,
        DIV => arithmetic::div,
        SDIV => arithmetic::sdiv,
        MOD => arithmetic::rem,
        SMOD => arithmetic::smod,
        ADDMOD => arithmetic::addmod,
        MULMOD => arithmetic::mulmod,
        EXP => arithmetic::exp,
        SIGNEXTEND => arithmetic::signextend,

        LT => bitwise::lt,
        GT => bitwise::gt,
        SLT => bitwise::slt,
        SGT => bitwise::sgt,
        EQ => bitwise::eq,
        ISZERO => bitwise::iszero,
        AND => bitwise::and,
        OR => bitwise::or,
        XOR => bitwise::xor,
        NOT => bitwise::not,
        BYTE => bitwise::byte,
        SHL => bitwise::shl,
        SHR => bitwise::shr,
        SAR => bitwise::sar,

        SHA3 => environment::sha3,

        ADDRESS => environment::address,
        BALANCE => environment::balance,
        ORIGIN => environment::origin,
        CALLER => environment::caller,
        CALLVALUE => environment::callvalue,
        CALLDATALOAD => environment::calldataload,
        CALLDATASIZE => environment::calldatasize,
        CALLDATACOPY => environment::calldatacopy,
        CODESIZE => environment::codesize,
        CODECOPY => environment::codecopy,
        GASPRICE => environment::gasprice,
        EXTCODESIZE => environment::extcodesize,
        EXTCODECOPY => environment::extcodecopy,
        RETURNDATASIZE => environment::returndatasize,
        RETURNDATACOPY => environment::returndatacopy,
        EXTCODEHASH => environment::extcodehash,

        BLOCKHASH => environment::blockhash,
        COINBASE => environment::coinbase,
        TIMESTAMP => environment::timestamp,
        NUMBER => environment::number,
        PREVRANDAO => environment::prevrandao,
        GASLIMIT => environment::gaslimit,
        CHAINID => environment::chainid,
        SELFBALANCE => environment::selfbalance,
        BASEFEE => environment::basefee,

        POP => stack::pop,
        MLOAD => memory::mload,
        MSTORE => memory::mstore,
        MSTORE8 => memory::mstore8,
        SLOAD => storage::sload,
        SSTORE => storage::sstore,
        JUMP => control::jump,
        JUMPI => control::jumpi,
        PC => control::pc,
        MSIZE => memory::msize,
        GAS => control::gas,
        JUMPDEST => control::jumpdest,
        TLOAD => storage::tload,
        TSTORE => storage::tstore,

        RETURN => control::ret,
        REVERT => control::revert,

        // Not reachable: INVALID is excluded from the table and the
        // families above returned early
        _ => control::unimplemented,
    }
}

/// Push `value` and advance past a one-byte instruction
pub(crate) fn push_and_advance(state: &mut ExecutionState, value: Word) -> EvmResult<()> {
    state.stack.push(value)?;
    state.pc += 1;
    Ok(())
}

/// Validate `(offset, size)` operands and price the memory expansion they need
pub(crate) fn memory_range(
    state: &ExecutionState,
    offset: Word,
    size: Word,
) -> EvmResult<(usize, usize, u64)> {
    let (offset, size) = checked_range(offset, size)?;
    Ok((offset, size, state.memory.expansion_cost(offset, size)))
}

/// 2600 for the first touch of `address` in this execution, 100 after
pub(crate) fn account_access_cost(state: &ExecutionState, address: &Address) -> u64 {
    if state.is_address_warm(address) {
        cost::ACCOUNT_WARM
    } else {
        cost::ACCOUNT_COLD
    }
}

/// `size` bytes of `source` starting at `offset`, zero-filled past its end
pub(crate) fn padded_slice(source: &[u8], offset: Word, size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    if let Some(start) = offset.to_usize() {
        if start < source.len() {
            let end = start.saturating_add(size).min(source.len());
            out[..end - start].copy_from_slice(&source[start..end]);
        }
    }
    out
}
