//! LOG0-LOG4

use tessera_primitives::H256;

use super::memory_range;
use crate::error::{EvmResult, Log};
use crate::gas;
use crate::host::Host;
use crate::opcode::Opcode;
use crate::state::ExecutionState;

pub(super) fn log(state: &mut ExecutionState, _host: &dyn Host) -> EvmResult<()> {
    let topic_count = Opcode::from_byte(state.current_byte())
        .map(Opcode::log_topics)
        .unwrap_or(0);

    let (offset, size, expansion) =
        memory_range(state, state.stack.peek(0)?, state.stack.peek(1)?)?;
    state.gas.deduct(gas::log_data_gas(size).saturating_add(expansion))?;

    state.stack.pop_n::<2>()?;
    let mut topics = Vec::with_capacity(topic_count);
    for _ in 0..topic_count {
        topics.push(H256::from(state.stack.pop()?));
    }
    let data = state.memory.access(offset, size).to_vec();

    state.logs.push(Log {
        address: state.env.call.address,
        topics,
        data,
    });
    state.pc += 1;
    Ok(())
}
