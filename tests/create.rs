use ethereum_types::{Address, H256};
use evmloom::{util::*, *};

fn create_code() -> Bytecode {
    // CREATE(value=0, offset=0, size=32); return the pushed address.
    Bytecode::new()
        .pushv(32)
        .pushv(0)
        .pushv(0)
        .opcode(OpCode::CREATE)
        .ret_top()
}

#[test]
fn create_builds_an_initcode_frame() {
    let created = Address::from_low_u64_be(0xc0ffee);

    EvmTester::new()
        .apply_host_fn(move |host, _| {
            host.call_result.create_address = Some(created);
        })
        .code(create_code())
        .gas(100000)
        .status(StatusCode::Success)
        .output_value(0xc0ffee)
        .inspect_host(|host, msg| {
            let r = host.recorded.lock();

            assert_eq!(r.calls.len(), 1);
            let create_msg = r.calls.last().unwrap();
            assert_eq!(create_msg.kind, CallKind::Create);
            assert_eq!(create_msg.depth, 1);
            assert_eq!(create_msg.sender, msg.destination);
            assert_eq!(create_msg.destination, Address::zero());
            assert!(!create_msg.is_static);
            assert_eq!(create_msg.input_data.len(), 32);
        })
        .check()
}

#[test]
fn create_forwards_all_but_one_64th() {
    EvmTester::new()
        .code(create_code())
        .gas(40000)
        .status(StatusCode::Success)
        .inspect_host(|host, _| {
            // 40000 - 9 (pushes) - 32000 (CREATE) - 3 (expansion) = 7988.
            let available = 7988_i64;
            let r = host.recorded.lock();
            assert_eq!(r.calls.last().unwrap().gas, available - available / 64);
        })
        .check()
}

#[test]
fn create2_carries_the_salt() {
    let salt = H256::repeat_byte(0x5a);

    EvmTester::new()
        .revision(Revision::Constantinople)
        .code(
            Bytecode::new()
                .pushb(salt.0)
                .pushv(32)
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::CREATE2),
        )
        .gas(100000)
        .status(StatusCode::Success)
        .inspect_host(move |host, _| {
            let r = host.recorded.lock();
            assert_eq!(r.calls.len(), 1);
            assert_eq!(r.calls.last().unwrap().kind, CallKind::Create2 { salt });
        })
        .check()
}

#[test]
fn create2_pre_constantinople() {
    EvmTester::new()
        .revision(Revision::Homestead)
        .code(Bytecode::new().pushv(0).pushv(0).pushv(0).pushv(0).opcode(OpCode::CREATE2))
        .gas(100000)
        .status(StatusCode::UndefinedInstruction)
        .gas_left(0)
        .check()
}

#[test]
fn create_in_static_mode() {
    EvmTester::new()
        .set_static(true)
        .code(create_code())
        .gas(100000)
        .status(StatusCode::StaticModeViolation)
        .gas_left(0)
        .check()
}

#[test]
fn create_at_depth_limit_pushes_zero() {
    EvmTester::new()
        .depth(1024)
        .code(create_code())
        .gas(100000)
        .status(StatusCode::Success)
        .output_value(0)
        .inspect_host(|host, _| {
            assert!(host.recorded.lock().calls.is_empty());
        })
        .check()
}

#[test]
fn initcode_returning_ef_prefix_is_rejected() {
    // Executed as the initcode frame itself.
    let code = Bytecode::new().mstore8_value(0, 0xef).ret(0, 1);

    EvmTester::new()
        .revision(Revision::London)
        .kind(CallKind::Create)
        .code(code.clone())
        .gas(100000)
        .status(StatusCode::InvalidContractPrefix)
        .gas_left(0)
        .check();

    // Accepted before London.
    EvmTester::new()
        .revision(Revision::Berlin)
        .kind(CallKind::Create)
        .code(code)
        .gas(100000)
        .status(StatusCode::Success)
        .output_data([0xef])
        .check()
}

#[test]
fn initcode_reverting_ef_prefix_is_not_validated() {
    EvmTester::new()
        .revision(Revision::London)
        .kind(CallKind::Create)
        .code(
            Bytecode::new()
                .mstore8_value(0, 0xef)
                .pushv(1)
                .pushv(0)
                .opcode(OpCode::REVERT),
        )
        .gas(100000)
        .status(StatusCode::Revert)
        .output_data([0xef])
        .check()
}

#[test]
fn initcode_returning_oversized_code_is_rejected() {
    let code = Bytecode::new().ret(0, 0x6001);

    EvmTester::new()
        .kind(CallKind::Create)
        .code(code.clone())
        .status(StatusCode::MaxCodeSizeExceeded)
        .gas_left(0)
        .check();

    // The EIP-170 limit itself is fine.
    EvmTester::new()
        .kind(CallKind::Create)
        .code(Bytecode::new().ret(0, 0x6000))
        .status(StatusCode::Success)
        .check();

    // No deployed-size limit in the earliest revisions.
    EvmTester::new()
        .revision(Revision::Homestead)
        .kind(CallKind::Create)
        .code(code)
        .status(StatusCode::Success)
        .check()
}

#[test]
fn initcode_size_cap_applies_from_shanghai() {
    let code = Bytecode::new()
        .pushv(MAX_INITCODE_SIZE + 1)
        .pushv(0)
        .pushv(0)
        .opcode(OpCode::CREATE);

    EvmTester::new()
        .revision(Revision::Shanghai)
        .code(code.clone())
        .status(StatusCode::MaxCodeSizeExceeded)
        .gas_left(0)
        .check();

    EvmTester::new()
        .revision(Revision::Merge)
        .code(code)
        .status(StatusCode::Success)
        .check()
}

#[test]
fn initcode_word_metering_from_shanghai() {
    // 64 initcode bytes cost an extra 2 gas per word from Shanghai on.
    let code = Bytecode::new().pushv(64).pushv(0).pushv(0).opcode(OpCode::CREATE);

    EvmTester::new()
        .revision(Revision::Shanghai)
        .code(code.clone())
        .gas(40000)
        .status(StatusCode::Success)
        .inspect_host(|host, _| {
            // 40000 - 9 - 32000 - 6 (expansion) - 4 (metering) = 7981.
            let available = 7981_i64;
            let r = host.recorded.lock();
            assert_eq!(r.calls.last().unwrap().gas, available - available / 64);
        })
        .check();

    EvmTester::new()
        .revision(Revision::Merge)
        .code(code)
        .gas(40000)
        .status(StatusCode::Success)
        .inspect_host(|host, _| {
            let available = 7985_i64;
            let r = host.recorded.lock();
            assert_eq!(r.calls.last().unwrap().gas, available - available / 64);
        })
        .check()
}

#[test]
fn create_address_helpers() {
    // The core computes both flavors for hosts.
    let sender = Address::from_low_u64_be(0x1234);
    assert_ne!(create_address(sender, 0), create_address(sender, 1));

    let initcode = [0xfe_u8];
    let a = create2_address(sender, H256::repeat_byte(1), &initcode);
    let b = create2_address(sender, H256::repeat_byte(2), &initcode);
    assert_ne!(a, b);
}
