use crate::{
    common::u256_to_address,
    host::Host,
    state::{num_words, ExecutionState, Stack},
    StatusCode, MEMORY_LIMIT,
};
use ethereum_types::U256;
use sha3::{Digest, Keccak256};
use std::{cmp::min, num::NonZeroUsize};

/// Gas per copied word for the *COPY instructions.
const COPY_WORD_COST: i64 = 3;

/// A verified, charged-for region of the frame's memory.
pub(crate) struct MemoryRegion {
    pub offset: usize,
    pub size: NonZeroUsize,
}

/// Charge for and perform the expansion needed to touch `size` bytes at
/// `offset`. The memory is unchanged when an error is returned.
pub(crate) fn grow_memory(
    state: &mut ExecutionState,
    offset: U256,
    size: NonZeroUsize,
) -> Result<MemoryRegion, StatusCode> {
    if offset > U256::from(MEMORY_LIMIT) {
        return Err(StatusCode::MemoryLimitExceeded);
    }

    let offset = offset.as_usize();
    let end = offset
        .checked_add(size.get())
        .filter(|end| *end <= MEMORY_LIMIT)
        .ok_or(StatusCode::MemoryLimitExceeded)?;

    if end > state.memory.size() {
        let cost = state.memory.expansion_gas(end);
        state.gas_left -= cost;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
        state.memory.grow(end);
    }

    Ok(MemoryRegion { offset, size })
}

pub(crate) fn verify_memory_region(
    state: &mut ExecutionState,
    offset: U256,
    size: U256,
) -> Result<Option<MemoryRegion>, StatusCode> {
    if size.is_zero() {
        return Ok(None);
    }

    if size > U256::from(MEMORY_LIMIT) {
        return Err(StatusCode::MemoryLimitExceeded);
    }

    grow_memory(state, offset, NonZeroUsize::new(size.as_usize()).unwrap()).map(Some)
}

pub(crate) fn mload(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let index = state.stack.pop();

    let region = grow_memory(state, index, NonZeroUsize::new(32).unwrap())?;

    let value = state.memory.load_word(region.offset);
    state.stack.push(value);

    Ok(())
}

pub(crate) fn mstore(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let index = state.stack.pop();
    let value = state.stack.pop();

    let region = grow_memory(state, index, NonZeroUsize::new(32).unwrap())?;

    state.memory.store_word(region.offset, value);

    Ok(())
}

pub(crate) fn mstore8(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let index = state.stack.pop();
    let value = state.stack.pop();

    let region = grow_memory(state, index, NonZeroUsize::new(1).unwrap())?;

    state.memory.store_byte(region.offset, value.low_u32() as u8);

    Ok(())
}

pub(crate) fn msize(state: &mut ExecutionState) {
    state.stack.push(state.memory.size().into());
}

/// MCOPY (EIP-5656): overlapping copy within the frame's memory.
pub(crate) fn mcopy(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let dst = state.stack.pop();
    let src = state.stack.pop();
    let size = state.stack.pop();

    if size.is_zero() {
        return Ok(());
    }

    if size > U256::from(MEMORY_LIMIT) {
        return Err(StatusCode::MemoryLimitExceeded);
    }
    let size = NonZeroUsize::new(size.as_usize()).unwrap();

    // Expand over the further of the two ends; the nearer one is in bounds
    // by construction.
    grow_memory(state, std::cmp::max(dst, src), size)?;

    state.gas_left -= num_words(size.get()) * COPY_WORD_COST;
    if state.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    state
        .memory
        .copy_within(src.as_usize(), dst.as_usize(), size.get());

    Ok(())
}

pub(crate) fn keccak256(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let index = state.stack.pop();
    let size = state.stack.pop();

    let region = verify_memory_region(state, index, size)?;

    let data = if let Some(region) = region {
        let cost = num_words(region.size.get()) * 6;
        state.gas_left -= cost;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        state.memory.to_vec(region.offset, region.size.get())
    } else {
        Vec::new()
    };

    state
        .stack
        .push(U256::from_big_endian(&Keccak256::digest(&data)));

    Ok(())
}

/// Copy `data[src..]` into a charged-for region, zero-filling the tail the
/// source cannot cover. Shared by the CALLDATACOPY/CODECOPY pair.
fn copy_into_region(
    state: &mut ExecutionState,
    region: MemoryRegion,
    data: &[u8],
    data_index: U256,
) -> Result<(), StatusCode> {
    let copy_cost = num_words(region.size.get()) * COPY_WORD_COST;
    state.gas_left -= copy_cost;
    if state.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    let src = min(U256::from(data.len()), data_index).as_usize();
    let copy_size = min(region.size.get(), data.len() - src);

    if copy_size > 0 {
        state.memory.store(region.offset, &data[src..src + copy_size]);
    }

    if region.size.get() - copy_size > 0 {
        state
            .memory
            .fill_zero(region.offset + copy_size, region.size.get() - copy_size);
    }

    Ok(())
}

pub(crate) fn calldatacopy(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let mem_index = state.stack.pop();
    let input_index = state.stack.pop();
    let size = state.stack.pop();

    if let Some(region) = verify_memory_region(state, mem_index, size)? {
        let data = state.message.input_data.clone();
        copy_into_region(state, region, &data, input_index)?;
    }

    Ok(())
}

pub(crate) fn codesize(stack: &mut Stack, code: &[u8]) {
    stack.push(code.len().into())
}

pub(crate) fn codecopy(state: &mut ExecutionState, code: &[u8]) -> Result<(), StatusCode> {
    let mem_index = state.stack.pop();
    let input_index = state.stack.pop();
    let size = state.stack.pop();

    if let Some(region) = verify_memory_region(state, mem_index, size)? {
        copy_into_region(state, region, code, input_index)?;
    }

    Ok(())
}

pub(crate) fn extcodecopy<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let addr = u256_to_address(state.stack.pop());
    let mem_index = state.stack.pop();
    let input_index = state.stack.pop();
    let size = state.stack.pop();

    let region = verify_memory_region(state, mem_index, size)?;

    if let Some(region) = &region {
        let copy_cost = num_words(region.size.get()) * COPY_WORD_COST;
        state.gas_left -= copy_cost;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    super::external::charge_account_access(state, host, addr)?;

    if let Some(region) = region {
        let src = min(U256::from(MEMORY_LIMIT), input_index).as_usize();

        let mut code = vec![0; region.size.get()];
        let copied = host.copy_code(addr, src, &mut code)?;
        debug_assert!(copied <= code.len());

        state.memory.store(region.offset, &code[..copied]);
        if region.size.get() - copied > 0 {
            state
                .memory
                .fill_zero(region.offset + copied, region.size.get() - copied);
        }
    }

    Ok(())
}

pub(crate) fn returndatasize(state: &mut ExecutionState) {
    state.stack.push(state.return_data.len().into());
}

pub(crate) fn returndatacopy(state: &mut ExecutionState) -> Result<(), StatusCode> {
    let mem_index = state.stack.pop();
    let input_index = state.stack.pop();
    let size = state.stack.pop();

    let region = verify_memory_region(state, mem_index, size)?;

    if input_index > U256::from(state.return_data.len()) {
        return Err(StatusCode::InvalidMemoryAccess);
    }
    let src = input_index.as_usize();

    if src + region.as_ref().map(|r| r.size.get()).unwrap_or(0) > state.return_data.len() {
        return Err(StatusCode::InvalidMemoryAccess);
    }

    if let Some(region) = region {
        let copy_cost = num_words(region.size.get()) * COPY_WORD_COST;
        state.gas_left -= copy_cost;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        let data = state.return_data.clone();
        state
            .memory
            .store(region.offset, &data[src..src + region.size.get()]);
    }

    Ok(())
}
