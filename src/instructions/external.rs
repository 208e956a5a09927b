use crate::{
    common::{address_to_u256, u256_to_address},
    host::*,
    instructions::properties::*,
    state::ExecutionState,
    Revision, StatusCode,
};
use arrayvec::ArrayVec;
use ethereum_types::{Address, H256, U256};

pub(crate) fn address(state: &mut ExecutionState) {
    state.stack.push(address_to_u256(state.message.destination));
}

pub(crate) fn caller(state: &mut ExecutionState) {
    state.stack.push(address_to_u256(state.message.sender));
}

pub(crate) fn callvalue(state: &mut ExecutionState) {
    state.stack.push(state.message.value);
}

/// Charge the EIP-2929 cold surcharge if the account access turns out to be
/// the first in this transaction. The warm cost is already part of the
/// instruction's base cost.
pub(crate) fn charge_account_access<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
    address: Address,
) -> Result<(), StatusCode> {
    if state.evm_revision >= Revision::Berlin && host.access_account(address)? == AccessStatus::Cold
    {
        state.gas_left -= i64::from(ADDITIONAL_COLD_ACCOUNT_ACCESS_COST);
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    Ok(())
}

pub(crate) fn balance<H: Host>(state: &mut ExecutionState, host: &mut H) -> Result<(), StatusCode> {
    let address = u256_to_address(state.stack.pop());

    charge_account_access(state, host, address)?;

    state.stack.push(host.get_balance(address)?);

    Ok(())
}

pub(crate) fn selfbalance<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let balance = host.get_balance(state.message.destination)?;
    state.stack.push(balance);

    Ok(())
}

pub(crate) fn extcodesize<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let address = u256_to_address(state.stack.pop());

    charge_account_access(state, host, address)?;

    state.stack.push(host.get_code_size(address)?);

    Ok(())
}

pub(crate) fn extcodehash<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let address = u256_to_address(state.stack.pop());

    charge_account_access(state, host, address)?;

    state
        .stack
        .push(U256::from_big_endian(host.get_code_hash(address)?.as_bytes()));

    Ok(())
}

pub(crate) fn blockhash<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let number = state.stack.pop();

    let upper_bound = host.get_tx_context()?.block_number;
    let lower_bound = upper_bound.saturating_sub(256);

    let mut header = H256::zero();
    if number <= u64::MAX.into() {
        let n = number.as_u64();
        if (lower_bound..upper_bound).contains(&n) {
            header = host.get_block_hash(n)?;
        }
    }

    state.stack.push(U256::from_big_endian(&header.0));

    Ok(())
}

/// BLOBHASH (EIP-4844): versioned hash of the indexed transaction blob, or
/// zero out of range. The hashes themselves are host-provided.
pub(crate) fn blobhash<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    let index = state.stack.pop();

    let hashes = host.get_tx_context()?.blob_hashes;

    state.stack.push(if index < U256::from(hashes.len()) {
        U256::from_big_endian(hashes[index.as_usize()].as_bytes())
    } else {
        U256::zero()
    });

    Ok(())
}

pub(crate) fn push_txcontext<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
    accessor: fn(TxContext) -> U256,
) -> Result<(), StatusCode> {
    state.stack.push(accessor(host.get_tx_context()?));

    Ok(())
}

pub(crate) fn origin_accessor(tx_context: TxContext) -> U256 {
    address_to_u256(tx_context.tx_origin)
}

pub(crate) fn coinbase_accessor(tx_context: TxContext) -> U256 {
    address_to_u256(tx_context.block_coinbase)
}

pub(crate) fn gasprice_accessor(tx_context: TxContext) -> U256 {
    tx_context.tx_gas_price
}

pub(crate) fn timestamp_accessor(tx_context: TxContext) -> U256 {
    tx_context.block_timestamp.into()
}

pub(crate) fn number_accessor(tx_context: TxContext) -> U256 {
    tx_context.block_number.into()
}

pub(crate) fn gaslimit_accessor(tx_context: TxContext) -> U256 {
    tx_context.block_gas_limit.into()
}

pub(crate) fn difficulty_accessor(tx_context: TxContext) -> U256 {
    tx_context.block_difficulty
}

pub(crate) fn chainid_accessor(tx_context: TxContext) -> U256 {
    tx_context.chain_id
}

pub(crate) fn basefee_accessor(tx_context: TxContext) -> U256 {
    tx_context.block_base_fee
}

pub(crate) fn blobbasefee_accessor(tx_context: TxContext) -> U256 {
    tx_context.blob_base_fee
}

pub(crate) fn sload<H: Host>(state: &mut ExecutionState, host: &mut H) -> Result<(), StatusCode> {
    let key = H256(state.stack.pop().into());
    let address = state.message.destination;

    if state.evm_revision >= Revision::Berlin
        && host.access_storage(address, key)? == AccessStatus::Cold
    {
        // The warm storage access cost comes from the cost table; apply the
        // additional cold access cost here.
        const ADDITIONAL_COLD_SLOAD_COST: u16 = COLD_SLOAD_COST - WARM_STORAGE_READ_COST;
        state.gas_left -= i64::from(ADDITIONAL_COLD_SLOAD_COST);
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    let value = host.get_storage(address, key)?;
    state.stack.push(U256::from_big_endian(value.as_bytes()));

    Ok(())
}

pub(crate) fn sstore<H: Host>(state: &mut ExecutionState, host: &mut H) -> Result<(), StatusCode> {
    if state.message.is_static {
        return Err(StatusCode::StaticModeViolation);
    }

    if state.evm_revision >= Revision::Istanbul && state.gas_left <= SSTORE_SENTRY {
        return Err(StatusCode::OutOfGas);
    }

    let key = H256(state.stack.pop().into());
    let value = H256(state.stack.pop().into());
    let address = state.message.destination;

    let mut cost = 0;
    if state.evm_revision >= Revision::Berlin
        && host.access_storage(address, key)? == AccessStatus::Cold
    {
        cost = COLD_SLOAD_COST;
    }

    let status = host.set_storage(address, key, value)?;

    cost = match status {
        StorageStatus::Unchanged | StorageStatus::ModifiedAgain => {
            if state.evm_revision >= Revision::Berlin {
                cost + WARM_STORAGE_READ_COST
            } else if state.evm_revision == Revision::Istanbul {
                800
            } else if state.evm_revision == Revision::Constantinople {
                200
            } else {
                5000
            }
        }
        StorageStatus::Modified | StorageStatus::Deleted => {
            if state.evm_revision >= Revision::Berlin {
                cost + 5000 - COLD_SLOAD_COST
            } else {
                5000
            }
        }
        StorageStatus::Added => cost + 20000,
    };
    state.gas_left -= i64::from(cost);
    if state.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    Ok(())
}

pub(crate) fn tload<H: Host>(state: &mut ExecutionState, host: &mut H) -> Result<(), StatusCode> {
    let key = H256(state.stack.pop().into());

    let value = host.get_transient_storage(state.message.destination, key)?;
    state.stack.push(U256::from_big_endian(value.as_bytes()));

    Ok(())
}

pub(crate) fn tstore<H: Host>(state: &mut ExecutionState, host: &mut H) -> Result<(), StatusCode> {
    if state.message.is_static {
        return Err(StatusCode::StaticModeViolation);
    }

    let key = H256(state.stack.pop().into());
    let value = H256(state.stack.pop().into());

    host.set_transient_storage(state.message.destination, key, value)?;

    Ok(())
}

pub(crate) fn do_log<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
    num_topics: usize,
) -> Result<(), StatusCode> {
    if state.message.is_static {
        return Err(StatusCode::StaticModeViolation);
    }

    let offset = state.stack.pop();
    let size = state.stack.pop();

    let region = super::memory::verify_memory_region(state, offset, size)?;

    if let Some(region) = &region {
        let cost = region.size.get() as i64 * 8;
        state.gas_left -= cost;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    let mut topics = ArrayVec::<H256, 4>::new();
    for _ in 0..num_topics {
        topics.push(H256(state.stack.pop().into()));
    }

    let data = region
        .map(|region| state.memory.to_vec(region.offset, region.size.get()))
        .unwrap_or_default();

    host.emit_log(state.message.destination, &data, topics.as_slice())?;

    Ok(())
}

pub(crate) fn selfdestruct<H: Host>(
    state: &mut ExecutionState,
    host: &mut H,
) -> Result<(), StatusCode> {
    if state.message.is_static {
        return Err(StatusCode::StaticModeViolation);
    }

    let beneficiary = u256_to_address(state.stack.pop());

    if state.evm_revision >= Revision::Berlin
        && host.access_account(beneficiary)? == AccessStatus::Cold
    {
        state.gas_left -= i64::from(COLD_ACCOUNT_ACCESS_COST);
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    // Cost of force-creating the beneficiary when funds move to an account
    // that does not exist yet.
    if state.evm_revision >= Revision::Byzantium
        && !host.get_balance(state.message.destination)?.is_zero()
        && !host.account_exists(beneficiary)?
    {
        state.gas_left -= 25000;
        if state.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    host.selfdestruct(state.message.destination, beneficiary)?;

    Ok(())
}
