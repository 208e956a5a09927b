use bytes::Bytes;
use ethereum_types::{Address, H256};
use evmloom::{opcode::*, util::*, *};
use hex_literal::hex;

#[test]
fn blockhash_window() {
    let t = EvmTester::new()
        .apply_host_fn(|host, _| {
            host.tx_context.block_number = 300;
            host.block_hash = H256::repeat_byte(0xbc);
        });

    // In the 256-block window.
    t.clone()
        .code(Bytecode::new().pushv(250).opcode(OpCode::BLOCKHASH).ret_top())
        .status(StatusCode::Success)
        .output_data([0xbc; 32])
        .check();

    // The current block and anything older than 256 blocks hash to zero.
    for number in [300_u64, 43, 1 << 40] {
        t.clone()
            .code(Bytecode::new().pushv(number).opcode(OpCode::BLOCKHASH).ret_top())
            .status(StatusCode::Success)
            .output_value(0)
            .check();
    }
}

#[test]
fn tx_context_accessors() {
    let t = EvmTester::new().apply_host_fn(|host, _| {
        host.tx_context.tx_origin = Address::from_low_u64_be(0x0a);
        host.tx_context.tx_gas_price = 0x0b.into();
        host.tx_context.block_timestamp = 0x0c;
        host.tx_context.block_number = 0x0d;
        host.tx_context.block_gas_limit = 0x0e;
        host.tx_context.block_coinbase = Address::from_low_u64_be(0x0f);
    });

    for (op, expected) in [
        (OpCode::ORIGIN, 0x0a_u64),
        (OpCode::GASPRICE, 0x0b),
        (OpCode::TIMESTAMP, 0x0c),
        (OpCode::NUMBER, 0x0d),
        (OpCode::GASLIMIT, 0x0e),
        (OpCode::COINBASE, 0x0f),
    ] {
        t.clone()
            .code(Bytecode::new().opcode(op).ret_top())
            .status(StatusCode::Success)
            .output_value(expected)
            .check();
    }
}

#[test]
fn address_caller_and_value() {
    EvmTester::new()
        .destination(Address::from_low_u64_be(0xdd))
        .code(Bytecode::new().opcode(OpCode::ADDRESS).ret_top())
        .status(StatusCode::Success)
        .output_value(0xdd)
        .check();

    EvmTester::new()
        .sender(Address::from_low_u64_be(0xcc))
        .code(Bytecode::new().opcode(OpCode::CALLER).ret_top())
        .status(StatusCode::Success)
        .output_value(0xcc)
        .check();

    EvmTester::new()
        .value(0x42)
        .code(Bytecode::new().opcode(OpCode::CALLVALUE).ret_top())
        .status(StatusCode::Success)
        .output_value(0x42)
        .check();
}

#[test]
fn extcodesize_and_balance_of_host_account() {
    let address = Address::from_low_u64_be(0xaa);

    EvmTester::new()
        .apply_host_fn(move |host, _| {
            let account = host.accounts.entry(address).or_default();
            account.code = Bytes::from_static(&hex!("deadbeef"));
            account.balance = 7.into();
        })
        .code(Bytecode::new().pushv(0xaa).opcode(OpCode::EXTCODESIZE).ret_top())
        .status(StatusCode::Success)
        .output_value(4)
        .check();

    EvmTester::new()
        .apply_host_fn(move |host, _| {
            host.accounts.entry(address).or_default().balance = 7.into();
        })
        .code(Bytecode::new().pushv(0xaa).opcode(OpCode::BALANCE).ret_top())
        .status(StatusCode::Success)
        .output_value(7)
        .check();
}

#[test]
fn extcodecopy_pads_with_zeros() {
    EvmTester::new()
        .apply_host_fn(|host, _| {
            host.accounts.entry(Address::from_low_u64_be(0xaa)).or_default().code =
                Bytes::from_static(&hex!("c0de"));
        })
        .code(
            Bytecode::new()
                .pushv(4) // size
                .pushv(0) // code offset
                .pushv(0) // memory offset
                .pushv(0xaa)
                .opcode(OpCode::EXTCODECOPY)
                .ret(0, 4),
        )
        .status(StatusCode::Success)
        .output_data(hex!("c0de0000"))
        .check()
}

#[test]
fn extcodehash_of_missing_account_is_zero() {
    EvmTester::new()
        .revision(Revision::Constantinople)
        .code(Bytecode::new().pushv(0xaa).opcode(OpCode::EXTCODEHASH).ret_top())
        .status(StatusCode::Success)
        .output_value(0)
        .check()
}

#[test]
fn selfdestruct_records_beneficiary() {
    EvmTester::new()
        .code(Bytecode::new().pushv(0xbe).opcode(OpCode::SELFDESTRUCT))
        .gas(100000)
        .status(StatusCode::Success)
        .inspect_host(|host, msg| {
            let r = host.recorded.lock();
            assert_eq!(
                r.selfdestructs.as_slice(),
                [SelfdestructRecord {
                    selfdestructed: msg.destination,
                    beneficiary: Address::from_low_u64_be(0xbe),
                }]
            );
        })
        .check()
}

#[test]
fn selfdestruct_in_static_mode() {
    EvmTester::new()
        .set_static(true)
        .code(Bytecode::new().pushv(0xbe).opcode(OpCode::SELFDESTRUCT))
        .status(StatusCode::StaticModeViolation)
        .gas_left(0)
        .check()
}

#[test]
fn selfdestruct_cold_beneficiary_surcharge() {
    EvmTester::new()
        .revision(Revision::Berlin)
        .code(Bytecode::new().pushv(0xbe).opcode(OpCode::SELFDESTRUCT))
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(3 + 5000 + 2600)
        .check()
}

#[test]
fn selfdestruct_terminates_the_frame() {
    // Nothing after SELFDESTRUCT runs.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0xbe)
                .opcode(OpCode::SELFDESTRUCT)
                .opcode(OpCode::INVALID),
        )
        .gas(100000)
        .status(StatusCode::Success)
        .check()
}
