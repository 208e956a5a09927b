use crate::{
    common::{address_to_u256, u256_to_address},
    host::Host,
    instructions::{
        external::charge_account_access,
        memory::{verify_memory_region, MemoryRegion},
        properties::INITCODE_WORD_COST,
    },
    state::{num_words, ExecutionState},
    CallKind, Message, Revision, StatusCode, CALL_DEPTH_LIMIT, MAX_INITCODE_SIZE,
};
use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use std::cmp::min;

/// The sequential gas counter at this point of the block: the block's
/// static gas is deducted up front, so the part belonging to instructions
/// past this one is credited back for observation.
fn corrected_gas_left(state: &ExecutionState, gas_prefix: u32) -> i64 {
    state.gas_left + i64::from(state.current_block_cost - gas_prefix)
}

pub(crate) fn do_call<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
    kind: CallKind,
    is_static_call: bool,
    gas_prefix: u32,
) -> Result<(), StatusCode> {
    let gas = state.stack.pop();
    let dst = u256_to_address(state.stack.pop());
    let value = if is_static_call || kind == CallKind::DelegateCall {
        U256::zero()
    } else {
        state.stack.pop()
    };
    let has_value = !value.is_zero();
    let input_offset = state.stack.pop();
    let input_size = state.stack.pop();
    let output_offset = state.stack.pop();
    let output_size = state.stack.pop();

    state.stack.push(U256::zero()); // Assume failure.

    charge_account_access(state, host, dst)?;

    let input_region = verify_memory_region(state, input_offset, input_size)?;
    let output_region = verify_memory_region(state, output_offset, output_size)?;

    let mut msg = Message {
        kind,
        is_static: is_static_call || state.message.is_static,
        depth: state.message.depth + 1,
        destination: dst,
        sender: if kind == CallKind::DelegateCall {
            state.message.sender
        } else {
            state.message.destination
        },
        gas: i64::MAX,
        value: if kind == CallKind::DelegateCall {
            state.message.value
        } else {
            value
        },
        input_data: input_region
            .map(|MemoryRegion { offset, size }| state.memory.to_vec(offset, size.get()).into())
            .unwrap_or_default(),
    };

    let mut cost = if has_value { 9000 } else { 0 };

    if kind == CallKind::Call {
        if has_value && state.message.is_static {
            return Err(StatusCode::StaticModeViolation);
        }

        if (has_value || state.evm_revision < Revision::Byzantium)
            && !host.account_exists(dst)?
        {
            cost += 25000;
        }
    }
    state.gas_left -= cost;
    if state.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    if gas < U256::from(i64::MAX) {
        msg.gas = gas.low_u64() as i64;
    }

    let gas_left = corrected_gas_left(state, gas_prefix);
    if state.evm_revision >= Revision::Byzantium {
        // All but one 64th (EIP-150).
        msg.gas = min(msg.gas, gas_left - gas_left / 64);
    } else if msg.gas > gas_left {
        return Err(StatusCode::OutOfGas);
    }

    if has_value {
        // The stipend is the sub-frame's; whatever remains of it flows back
        // with the rest of its unused gas.
        msg.gas += 2300;
        state.gas_left += 2300;
    }

    state.return_data.clear();

    if state.message.depth < CALL_DEPTH_LIMIT
        && !(has_value && host.get_balance(state.message.destination)? < value)
    {
        let msg_gas = msg.gas;
        let result = host.call(&msg)?;
        state.return_data = result.output_data.clone();
        *state.stack.get_mut(0) = if result.status_code == StatusCode::Success {
            U256::one()
        } else {
            U256::zero()
        };

        if let Some(MemoryRegion { offset, size }) = output_region {
            let copy_size = min(size.get(), result.output_data.len());
            if copy_size > 0 {
                state.memory.store(offset, &result.output_data[..copy_size]);
            }
        }

        // The forwarded amount was computed on the corrected counter and
        // may exceed the physical one when the block still has prepaid
        // instructions; a negative balance here is the sequential OOG.
        let gas_used = msg_gas - result.gas_left;
        state.gas_left -= gas_used;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    Ok(())
}

pub(crate) fn do_create<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
    create2: bool,
    gas_prefix: u32,
) -> Result<(), StatusCode> {
    if state.message.is_static {
        return Err(StatusCode::StaticModeViolation);
    }

    let endowment = state.stack.pop();
    let init_code_offset = state.stack.pop();
    let init_code_size = state.stack.pop();

    let region = verify_memory_region(state, init_code_offset, init_code_size)?;

    if state.evm_revision >= Revision::Shanghai {
        // EIP-3860: initcode size cap and per-word metering.
        if init_code_size > U256::from(MAX_INITCODE_SIZE) {
            return Err(StatusCode::MaxCodeSizeExceeded);
        }
        state.gas_left -= INITCODE_WORD_COST * num_words(init_code_size.as_usize());
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    let call_kind = if create2 {
        let salt = state.stack.pop();

        if let Some(region) = &region {
            let salt_cost = num_words(region.size.get()) * 6;
            state.gas_left -= salt_cost;
            if state.gas_left < 0 {
                return Err(StatusCode::OutOfGas);
            }
        }

        CallKind::Create2 {
            salt: H256(salt.into()),
        }
    } else {
        CallKind::Create
    };

    state.stack.push(U256::zero());
    state.return_data.clear();

    if state.message.depth < CALL_DEPTH_LIMIT
        && !(!endowment.is_zero() && host.get_balance(state.message.destination)? < endowment)
    {
        let gas_left = corrected_gas_left(state, gas_prefix);

        let msg = Message {
            gas: if state.evm_revision >= Revision::Byzantium {
                gas_left - gas_left / 64
            } else {
                gas_left
            },

            is_static: false,
            destination: Address::zero(),

            kind: call_kind,
            input_data: region
                .map(|MemoryRegion { offset, size }| state.memory.to_vec(offset, size.get()).into())
                .unwrap_or_else(Bytes::new),
            sender: state.message.destination,
            depth: state.message.depth + 1,
            value: endowment,
        };
        let msg_gas = msg.gas;
        let result = host.call(&msg)?;
        state.gas_left -= msg_gas - result.gas_left;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        state.return_data = result.output_data;
        if result.status_code == StatusCode::Success {
            *state.stack.get_mut(0) =
                address_to_u256(result.create_address.unwrap_or_default());
        }
    }

    Ok(())
}
