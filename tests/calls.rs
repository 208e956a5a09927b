use ethereum_types::{Address, H256, U256};
use evmloom::{util::*, *};
use hex_literal::hex;

#[test]
fn delegatecall() {
    let mut value = H256::zero();
    value.0[17] = 0xfe;

    EvmTester::new()
        .code(
            Bytecode::new()
                .append(hex!("6001600003600052")) // m[0] = 0xffffff...
                .append(hex!("600560046003600260016103e8f4")) // DELEGATECALL(1000, 0x01, ...)
                .append(hex!("60086000f3")),
        )
        .apply_host_fn(|host, _| {
            host.call_result.output_data = (&hex!("0a0b0c") as &[u8]).into();
            host.call_result.gas_left = 1;
        })
        .value(value.0)
        .gas(1700)
        .gas_used(1690)
        .status(StatusCode::Success)
        .output_data(hex!("ffffffff0a0b0cff"))
        .inspect_host(move |host, _| {
            let gas_left = 1700 - 736;

            let r = host.recorded.lock();

            assert_eq!(r.calls.len(), 1);
            let call_msg = r.calls.last().unwrap();
            assert_eq!(call_msg.gas, gas_left - gas_left / 64);
            assert_eq!(call_msg.input_data.len(), 3);
            assert_eq!(<[u8; 32]>::from(call_msg.value)[17], 0xfe);
        })
        .check()
}

/// Checks if DELEGATECALL forwards the "static" flag.
#[test]
fn delegatecall_static() {
    EvmTester::new()
        .set_static(true)
        .code(Bytecode::new().append_bc(CallInstruction::delegatecall(0).gas(1)))
        .status(StatusCode::Success)
        .gas_used(719)
        .inspect_host(|host, _| {
            let r = host.recorded.lock();

            assert_eq!(r.calls.len(), 1);
            let call_msg = r.calls.last().unwrap();
            assert_eq!(call_msg.gas, 1);
            assert!(call_msg.is_static);
        })
        .check()
}

#[test]
fn staticcall_sets_static_flag() {
    EvmTester::new()
        .code(Bytecode::new().append_bc(CallInstruction::staticcall(0xaa).gas(100)))
        .status(StatusCode::Success)
        .inspect_host(|host, _| {
            let r = host.recorded.lock();

            assert_eq!(r.calls.len(), 1);
            let call_msg = r.calls.last().unwrap();
            assert!(call_msg.is_static);
            assert_eq!(call_msg.kind, CallKind::Call);
            assert_eq!(
                call_msg.destination,
                Address::from_low_u64_be(0xaa)
            );
        })
        .check()
}

#[test]
fn call_with_value_in_static_mode() {
    EvmTester::new()
        .set_static(true)
        .code(Bytecode::new().append_bc(CallInstruction::call(0).gas(100).value(1)))
        .status(StatusCode::StaticModeViolation)
        .gas_left(0)
        .check()
}

#[test]
fn call_at_depth_limit_fails_quietly() {
    EvmTester::new()
        .depth(1024)
        .code(
            Bytecode::new()
                .append_bc(CallInstruction::call(0).gas(100))
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0)
        .inspect_host(|host, _| {
            assert!(host.recorded.lock().calls.is_empty());
        })
        .check()
}

#[test]
fn call_value_charges_without_recipient_balance() {
    // 9000 for the transfer and 25000 for touching a non-existent account
    // are charged even though the caller's balance is too small and the
    // call itself never happens; the 2300 stipend credit stays.
    EvmTester::new()
        .code(Bytecode::new().append_bc(CallInstruction::call(0xbb).gas(100).value(1)))
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(21 + 700 + 9000 + 25000 - 2300)
        .inspect_host(|host, _| {
            assert!(host.recorded.lock().calls.is_empty());
        })
        .check()
}

#[test]
fn call_with_value_adds_stipend() {
    EvmTester::new()
        .apply_host_fn(|host, msg| {
            host.accounts.entry(msg.destination).or_default().balance = 1.into();
            host.accounts
                .entry(Address::from_low_u64_be(0xcc))
                .or_default();
        })
        .code(Bytecode::new().append_bc(CallInstruction::call(0xcc).gas(5000).value(1)))
        .gas(100000)
        .status(StatusCode::Success)
        .inspect_host(|host, _| {
            let r = host.recorded.lock();

            assert_eq!(r.calls.len(), 1);
            let call_msg = r.calls.last().unwrap();
            assert_eq!(call_msg.gas, 5000 + 2300);
            assert_eq!(call_msg.value, U256::one());
        })
        .check()
}

#[test]
fn returndata_is_captured() {
    EvmTester::new()
        .apply_host_fn(|host, _| {
            host.call_result.output_data = (&hex!("aabbcc") as &[u8]).into();
        })
        .code(
            Bytecode::new()
                .append_bc(CallInstruction::call(0).gas(1))
                .opcode(OpCode::RETURNDATASIZE)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(3)
        .check()
}

#[test]
fn returndatacopy_past_buffer_fails() {
    EvmTester::new()
        .apply_host_fn(|host, _| {
            host.call_result.output_data = (&hex!("aabbcc") as &[u8]).into();
        })
        .code(
            Bytecode::new()
                .append_bc(CallInstruction::call(0).gas(1))
                .pushv(4) // size exceeds the 3-byte buffer
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::RETURNDATACOPY),
        )
        .status(StatusCode::InvalidMemoryAccess)
        .gas_left(0)
        .check()
}

#[test]
fn call_failure_pushes_zero_and_keeps_returndata() {
    EvmTester::new()
        .apply_host_fn(|host, _| {
            host.call_result.status_code = StatusCode::Revert;
            host.call_result.output_data = (&hex!("55") as &[u8]).into();
        })
        .code(
            Bytecode::new()
                .append_bc(CallInstruction::call(0).gas(1))
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0)
        .inspect_host(|host, _| {
            assert_eq!(host.recorded.lock().calls.len(), 1);
        })
        .check()
}

#[test]
fn call_output_is_copied_into_memory() {
    EvmTester::new()
        .apply_host_fn(|host, _| {
            host.call_result.output_data = (&hex!("0102030405") as &[u8]).into();
        })
        .code(
            Bytecode::new()
                // Three-byte output window at offset 0.
                .append_bc(CallInstruction::call(0).gas(1).output(0, 3))
                .ret(0, 3),
        )
        .status(StatusCode::Success)
        .output_data(hex!("010203"))
        .check()
}

#[test]
fn call_depth_exceeded_on_entry() {
    EvmTester::new()
        .depth(1025)
        .code(Bytecode::new().opcode(OpCode::STOP))
        .status(StatusCode::CallDepthExceeded)
        .gas_left(0)
        .check()
}

#[test]
fn cold_account_surcharge_on_call() {
    // Berlin: calling a cold address costs 2600 up front, warm 100.
    EvmTester::new()
        .revision(Revision::Berlin)
        .code(
            Bytecode::new()
                .append_bc(CallInstruction::call(0xaa).gas(0))
                .append_bc(CallInstruction::call(0xaa).gas(0)),
        )
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(42 + 100 + 2500 + 100)
        .check()
}
