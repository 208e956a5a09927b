use bytes::Bytes;
use ethereum_types::{Address, U256};
use evmloom::{opcode::*, tracing::NoopTracer, util::*, *};
use hex_literal::hex;

#[test]
fn add_two_ones() {
    EvmTester::new()
        .code(hex!("6001600101"))
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(9)
        .check()
}

#[test]
fn add_result_is_observable() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(1)
                .pushv(1)
                .opcode(OpCode::ADD)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .gas_used(24)
        .output_value(2)
        .check()
}

#[test]
fn return_single_byte_word() {
    EvmTester::new()
        .code(hex!("60ff60005260206000f3"))
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(18)
        .output_value(0xff)
        .check()
}

#[test]
fn division_by_zero() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(1)
                .opcode(OpCode::DIV)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0)
        .check()
}

#[test]
fn sdiv_int_min_by_minus_one() {
    let int_min = U256::one() << 255;

    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(U256::max_value())
                .pushv(int_min)
                .opcode(OpCode::SDIV)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(int_min)
        .check()
}

#[test]
fn truncated_push_runs_to_completion() {
    EvmTester::new()
        .code(hex!("62aabb"))
        .gas(100)
        .status(StatusCode::Success)
        .gas_used(3)
        .check()
}

#[test]
fn mstore_mload_round_trip() {
    let value: [u8; 32] = rand::random();

    EvmTester::new()
        .code(
            Bytecode::new()
                .pushb(value)
                .mstore(64)
                .pushv(64)
                .opcode(OpCode::MLOAD)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_data(value)
        .check()
}

#[test]
fn push_pop_leaves_stack_unchanged() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(42)
                .pushv(7)
                .opcode(OpCode::POP)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(42)
        .check()
}

#[test]
fn double_swap_restores_order() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(1)
                .pushv(2)
                .opcode(OpCode::SWAP1)
                .opcode(OpCode::SWAP1)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(2)
        .check()
}

#[test]
fn dup_then_pop_is_observationally_noop() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(5)
                .opcode(OpCode::DUP1)
                .opcode(OpCode::POP)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(5)
        .check()
}

#[test]
fn msize_is_word_granular() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(100)
                .opcode(OpCode::MLOAD)
                .opcode(OpCode::POP)
                .opcode(OpCode::MSIZE)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(160)
        .check()
}

#[test]
fn gas_reads_the_sequential_counter() {
    // The block's static gas is charged up front; GAS must still observe
    // the value per-instruction accounting would produce.
    EvmTester::new()
        .code(Bytecode::new().opcode(OpCode::GAS).ret_top())
        .gas(100000)
        .status(StatusCode::Success)
        .gas_used(17)
        .output_value(99998)
        .check()
}

#[test]
fn pc_reports_the_code_offset() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(1)
                .opcode(OpCode::POP)
                .opcode(OpCode::PC)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(3)
        .check()
}

#[test]
fn out_of_gas_at_block_admission() {
    EvmTester::new()
        .code(hex!("6001600101"))
        .gas(8)
        .status(StatusCode::OutOfGas)
        .gas_left(0)
        .check()
}

#[test]
fn stack_underflow_at_block_admission() {
    EvmTester::new()
        .code(Bytecode::new().opcode(OpCode::ADD))
        .status(StatusCode::StackUnderflow)
        .gas_left(0)
        .check()
}

#[test]
fn stack_overflow_at_block_admission() {
    EvmTester::new()
        .code(1025 * Bytecode::new().pushv(1))
        .status(StatusCode::StackOverflow)
        .gas_left(0)
        .check();

    // Exactly at the limit is fine.
    EvmTester::new()
        .code(1024 * Bytecode::new().pushv(1))
        .status(StatusCode::Success)
        .check()
}

#[test]
fn invalid_instruction_consumes_all_gas() {
    EvmTester::new()
        .code(Bytecode::new().opcode(OpCode::INVALID))
        .gas(100000)
        .status(StatusCode::InvalidInstruction)
        .gas_left(0)
        .check()
}

#[test]
fn memory_limit_is_enforced() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(U256::from(1_u64 << 33))
                .opcode(OpCode::MSTORE),
        )
        .status(StatusCode::MemoryLimitExceeded)
        .gas_left(0)
        .check()
}

#[test]
fn huge_expansion_runs_out_of_gas() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(U256::from(1_u64 << 31))
                .opcode(OpCode::MSTORE),
        )
        .gas(100000)
        .status(StatusCode::OutOfGas)
        .gas_left(0)
        .check()
}

#[test]
fn revert_preserves_gas_and_output() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .mstore8_value(0, 0xaa)
                .pushv(1)
                .pushv(0)
                .opcode(OpCode::REVERT),
        )
        .gas(100000)
        .status(StatusCode::Revert)
        .gas_used(18)
        .output_data([0xaa])
        .check()
}

#[test]
fn calldata_is_observable() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .opcode(OpCode::CALLDATALOAD)
                .ret_top(),
        )
        .input(&hex!("deadbeef") as &[u8])
        .status(StatusCode::Success)
        .inspect_output(|output| {
            assert_eq!(output[..4], hex!("deadbeef"));
            assert!(output[4..].iter().all(|b| *b == 0));
        })
        .check()
}

#[test]
fn codecopy_returns_own_code() {
    // The built sequence is exactly 12 bytes long.
    let code = Bytecode::new()
        .pushv(12)
        .pushv(0)
        .pushv(0)
        .opcode(OpCode::CODECOPY)
        .ret(0, 12)
        .build();
    assert_eq!(code.len(), 12);

    EvmTester::new()
        .code(code.clone())
        .status(StatusCode::Success)
        .output_data(code)
        .check()
}

#[test]
fn keccak256_of_memory() {
    // keccak("") for an empty region, no memory charge.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::KECCAK256)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_data(hex!(
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        ))
        .check()
}

#[test]
fn executes_against_a_child_memory_view() {
    let message = Message {
        kind: CallKind::Call,
        is_static: false,
        depth: 1,
        gas: 100000,
        destination: Address::zero(),
        sender: Address::zero(),
        input_data: Bytes::new(),
        value: U256::zero(),
    };

    let mut parent = Memory::new();
    parent.grow(32);
    parent.store_word(0, U256::max_value());

    // MLOAD(0); return it.
    let analysis = AnalyzedCode::analyze(
        Bytecode::new().pushv(0).opcode(OpCode::MLOAD).ret_top().build(),
        Revision::latest(),
    )
    .unwrap();

    let mut host = MockedHost::default();
    let state = ExecutionState::with_memory(message, Revision::latest(), parent.child());
    let output = analysis.execute_with_state(&mut host, &mut NoopTracer, state);

    // The child observes zeroed memory, not the parent's bytes.
    assert_eq!(output.status_code, StatusCode::Success);
    assert_eq!(&*output.output_data, [0_u8; 32]);
    assert_eq!(parent.load_word(0), U256::max_value());
}
