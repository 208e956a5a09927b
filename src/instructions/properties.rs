use once_cell::sync::Lazy;

use crate::{common::Revision, opcode::*};

pub(crate) const COLD_SLOAD_COST: u16 = 2100;
pub(crate) const COLD_ACCOUNT_ACCESS_COST: u16 = 2600;
pub(crate) const WARM_STORAGE_READ_COST: u16 = 100;

/// Additional cold account access cost.
///
/// The warm access cost is unconditionally applied for every account access
/// instruction. If the access turns out to be cold, this cost must be
/// applied additionally.
pub(crate) const ADDITIONAL_COLD_ACCOUNT_ACCESS_COST: u16 =
    COLD_ACCOUNT_ACCESS_COST - WARM_STORAGE_READ_COST;

/// Minimum gas left required by SSTORE from the Istanbul revision on (EIP-2200).
pub(crate) const SSTORE_SENTRY: i64 = 2300;

/// Gas per word of contract creation code (EIP-3860).
pub(crate) const INITCODE_WORD_COST: i64 = 2;

/// EVM instruction properties
#[derive(Clone, Copy, Debug)]
pub struct Properties {
    /// The instruction name
    pub name: &'static str,
    /// The number of stack items the instruction accesses during execution.
    pub stack_height_required: u8,
    /// The stack height change caused by the instruction execution. Can be negative.
    pub stack_height_change: i8,
}

impl Properties {
    fn new(name: &'static str, stack_height_required: u8, stack_height_change: i8) -> Self {
        Self {
            name,
            stack_height_required,
            stack_height_change,
        }
    }
}

pub static PROPERTIES: Lazy<[Option<Properties>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];

    table[OpCode::STOP.to_usize()] = Some(Properties::new("STOP", 0, 0));
    table[OpCode::ADD.to_usize()] = Some(Properties::new("ADD", 2, -1));
    table[OpCode::MUL.to_usize()] = Some(Properties::new("MUL", 2, -1));
    table[OpCode::SUB.to_usize()] = Some(Properties::new("SUB", 2, -1));
    table[OpCode::DIV.to_usize()] = Some(Properties::new("DIV", 2, -1));
    table[OpCode::SDIV.to_usize()] = Some(Properties::new("SDIV", 2, -1));
    table[OpCode::MOD.to_usize()] = Some(Properties::new("MOD", 2, -1));
    table[OpCode::SMOD.to_usize()] = Some(Properties::new("SMOD", 2, -1));
    table[OpCode::ADDMOD.to_usize()] = Some(Properties::new("ADDMOD", 3, -2));
    table[OpCode::MULMOD.to_usize()] = Some(Properties::new("MULMOD", 3, -2));
    table[OpCode::EXP.to_usize()] = Some(Properties::new("EXP", 2, -1));
    table[OpCode::SIGNEXTEND.to_usize()] = Some(Properties::new("SIGNEXTEND", 2, -1));

    table[OpCode::LT.to_usize()] = Some(Properties::new("LT", 2, -1));
    table[OpCode::GT.to_usize()] = Some(Properties::new("GT", 2, -1));
    table[OpCode::SLT.to_usize()] = Some(Properties::new("SLT", 2, -1));
    table[OpCode::SGT.to_usize()] = Some(Properties::new("SGT", 2, -1));
    table[OpCode::EQ.to_usize()] = Some(Properties::new("EQ", 2, -1));
    table[OpCode::ISZERO.to_usize()] = Some(Properties::new("ISZERO", 1, 0));
    table[OpCode::AND.to_usize()] = Some(Properties::new("AND", 2, -1));
    table[OpCode::OR.to_usize()] = Some(Properties::new("OR", 2, -1));
    table[OpCode::XOR.to_usize()] = Some(Properties::new("XOR", 2, -1));
    table[OpCode::NOT.to_usize()] = Some(Properties::new("NOT", 1, 0));
    table[OpCode::BYTE.to_usize()] = Some(Properties::new("BYTE", 2, -1));
    table[OpCode::SHL.to_usize()] = Some(Properties::new("SHL", 2, -1));
    table[OpCode::SHR.to_usize()] = Some(Properties::new("SHR", 2, -1));
    table[OpCode::SAR.to_usize()] = Some(Properties::new("SAR", 2, -1));

    table[OpCode::KECCAK256.to_usize()] = Some(Properties::new("KECCAK256", 2, -1));

    table[OpCode::ADDRESS.to_usize()] = Some(Properties::new("ADDRESS", 0, 1));
    table[OpCode::BALANCE.to_usize()] = Some(Properties::new("BALANCE", 1, 0));
    table[OpCode::ORIGIN.to_usize()] = Some(Properties::new("ORIGIN", 0, 1));
    table[OpCode::CALLER.to_usize()] = Some(Properties::new("CALLER", 0, 1));
    table[OpCode::CALLVALUE.to_usize()] = Some(Properties::new("CALLVALUE", 0, 1));
    table[OpCode::CALLDATALOAD.to_usize()] = Some(Properties::new("CALLDATALOAD", 1, 0));
    table[OpCode::CALLDATASIZE.to_usize()] = Some(Properties::new("CALLDATASIZE", 0, 1));
    table[OpCode::CALLDATACOPY.to_usize()] = Some(Properties::new("CALLDATACOPY", 3, -3));
    table[OpCode::CODESIZE.to_usize()] = Some(Properties::new("CODESIZE", 0, 1));
    table[OpCode::CODECOPY.to_usize()] = Some(Properties::new("CODECOPY", 3, -3));
    table[OpCode::GASPRICE.to_usize()] = Some(Properties::new("GASPRICE", 0, 1));
    table[OpCode::EXTCODESIZE.to_usize()] = Some(Properties::new("EXTCODESIZE", 1, 0));
    table[OpCode::EXTCODECOPY.to_usize()] = Some(Properties::new("EXTCODECOPY", 4, -4));
    table[OpCode::RETURNDATASIZE.to_usize()] = Some(Properties::new("RETURNDATASIZE", 0, 1));
    table[OpCode::RETURNDATACOPY.to_usize()] = Some(Properties::new("RETURNDATACOPY", 3, -3));
    table[OpCode::EXTCODEHASH.to_usize()] = Some(Properties::new("EXTCODEHASH", 1, 0));

    table[OpCode::BLOCKHASH.to_usize()] = Some(Properties::new("BLOCKHASH", 1, 0));
    table[OpCode::COINBASE.to_usize()] = Some(Properties::new("COINBASE", 0, 1));
    table[OpCode::TIMESTAMP.to_usize()] = Some(Properties::new("TIMESTAMP", 0, 1));
    table[OpCode::NUMBER.to_usize()] = Some(Properties::new("NUMBER", 0, 1));
    table[OpCode::DIFFICULTY.to_usize()] = Some(Properties::new("DIFFICULTY", 0, 1));
    table[OpCode::GASLIMIT.to_usize()] = Some(Properties::new("GASLIMIT", 0, 1));
    table[OpCode::CHAINID.to_usize()] = Some(Properties::new("CHAINID", 0, 1));
    table[OpCode::SELFBALANCE.to_usize()] = Some(Properties::new("SELFBALANCE", 0, 1));
    table[OpCode::BASEFEE.to_usize()] = Some(Properties::new("BASEFEE", 0, 1));
    table[OpCode::BLOBHASH.to_usize()] = Some(Properties::new("BLOBHASH", 1, 0));
    table[OpCode::BLOBBASEFEE.to_usize()] = Some(Properties::new("BLOBBASEFEE", 0, 1));

    table[OpCode::POP.to_usize()] = Some(Properties::new("POP", 1, -1));
    table[OpCode::MLOAD.to_usize()] = Some(Properties::new("MLOAD", 1, 0));
    table[OpCode::MSTORE.to_usize()] = Some(Properties::new("MSTORE", 2, -2));
    table[OpCode::MSTORE8.to_usize()] = Some(Properties::new("MSTORE8", 2, -2));
    table[OpCode::SLOAD.to_usize()] = Some(Properties::new("SLOAD", 1, 0));
    table[OpCode::SSTORE.to_usize()] = Some(Properties::new("SSTORE", 2, -2));
    table[OpCode::JUMP.to_usize()] = Some(Properties::new("JUMP", 1, -1));
    table[OpCode::JUMPI.to_usize()] = Some(Properties::new("JUMPI", 2, -2));
    table[OpCode::PC.to_usize()] = Some(Properties::new("PC", 0, 1));
    table[OpCode::MSIZE.to_usize()] = Some(Properties::new("MSIZE", 0, 1));
    table[OpCode::GAS.to_usize()] = Some(Properties::new("GAS", 0, 1));
    table[OpCode::JUMPDEST.to_usize()] = Some(Properties::new("JUMPDEST", 0, 0));
    table[OpCode::TLOAD.to_usize()] = Some(Properties::new("TLOAD", 1, 0));
    table[OpCode::TSTORE.to_usize()] = Some(Properties::new("TSTORE", 2, -2));
    table[OpCode::MCOPY.to_usize()] = Some(Properties::new("MCOPY", 3, -3));
    table[OpCode::PUSH0.to_usize()] = Some(Properties::new("PUSH0", 0, 1));

    for (i, op) in (OpCode::PUSH1.to_usize()..=OpCode::PUSH32.to_usize()).enumerate() {
        table[op] = Some(Properties::new(PUSH_NAMES[i], 0, 1));
    }

    for (i, op) in (OpCode::DUP1.to_usize()..=OpCode::DUP16.to_usize()).enumerate() {
        table[op] = Some(Properties::new(DUP_NAMES[i], 1 + i as u8, 1));
    }

    for (i, op) in (OpCode::SWAP1.to_usize()..=OpCode::SWAP16.to_usize()).enumerate() {
        table[op] = Some(Properties::new(SWAP_NAMES[i], 2 + i as u8, 0));
    }

    for (i, op) in (OpCode::LOG0.to_usize()..=OpCode::LOG4.to_usize()).enumerate() {
        table[op] = Some(Properties::new(LOG_NAMES[i], 2 + i as u8, -2 - (i as i8)));
    }

    table[OpCode::CREATE.to_usize()] = Some(Properties::new("CREATE", 3, -2));
    table[OpCode::CALL.to_usize()] = Some(Properties::new("CALL", 7, -6));
    table[OpCode::CALLCODE.to_usize()] = Some(Properties::new("CALLCODE", 7, -6));
    table[OpCode::RETURN.to_usize()] = Some(Properties::new("RETURN", 2, -2));
    table[OpCode::DELEGATECALL.to_usize()] = Some(Properties::new("DELEGATECALL", 6, -5));
    table[OpCode::CREATE2.to_usize()] = Some(Properties::new("CREATE2", 4, -3));
    table[OpCode::STATICCALL.to_usize()] = Some(Properties::new("STATICCALL", 6, -5));
    table[OpCode::REVERT.to_usize()] = Some(Properties::new("REVERT", 2, -2));
    table[OpCode::INVALID.to_usize()] = Some(Properties::new("INVALID", 0, 0));
    table[OpCode::SELFDESTRUCT.to_usize()] = Some(Properties::new("SELFDESTRUCT", 1, -1));

    table
});

const PUSH_NAMES: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9", "PUSH10",
    "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18", "PUSH19",
    "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27", "PUSH28",
    "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_NAMES: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_NAMES: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_NAMES: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

#[allow(clippy::needless_range_loop)]
static FRONTIER_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];

    table[OpCode::STOP.to_usize()] = Some(0);
    table[OpCode::ADD.to_usize()] = Some(3);
    table[OpCode::MUL.to_usize()] = Some(5);
    table[OpCode::SUB.to_usize()] = Some(3);
    table[OpCode::DIV.to_usize()] = Some(5);
    table[OpCode::SDIV.to_usize()] = Some(5);
    table[OpCode::MOD.to_usize()] = Some(5);
    table[OpCode::SMOD.to_usize()] = Some(5);
    table[OpCode::ADDMOD.to_usize()] = Some(8);
    table[OpCode::MULMOD.to_usize()] = Some(8);
    table[OpCode::EXP.to_usize()] = Some(10);
    table[OpCode::SIGNEXTEND.to_usize()] = Some(5);
    table[OpCode::LT.to_usize()] = Some(3);
    table[OpCode::GT.to_usize()] = Some(3);
    table[OpCode::SLT.to_usize()] = Some(3);
    table[OpCode::SGT.to_usize()] = Some(3);
    table[OpCode::EQ.to_usize()] = Some(3);
    table[OpCode::ISZERO.to_usize()] = Some(3);
    table[OpCode::AND.to_usize()] = Some(3);
    table[OpCode::OR.to_usize()] = Some(3);
    table[OpCode::XOR.to_usize()] = Some(3);
    table[OpCode::NOT.to_usize()] = Some(3);
    table[OpCode::BYTE.to_usize()] = Some(3);
    table[OpCode::KECCAK256.to_usize()] = Some(30);
    table[OpCode::ADDRESS.to_usize()] = Some(2);
    table[OpCode::BALANCE.to_usize()] = Some(20);
    table[OpCode::ORIGIN.to_usize()] = Some(2);
    table[OpCode::CALLER.to_usize()] = Some(2);
    table[OpCode::CALLVALUE.to_usize()] = Some(2);
    table[OpCode::CALLDATALOAD.to_usize()] = Some(3);
    table[OpCode::CALLDATASIZE.to_usize()] = Some(2);
    table[OpCode::CALLDATACOPY.to_usize()] = Some(3);
    table[OpCode::CODESIZE.to_usize()] = Some(2);
    table[OpCode::CODECOPY.to_usize()] = Some(3);
    table[OpCode::GASPRICE.to_usize()] = Some(2);
    table[OpCode::EXTCODESIZE.to_usize()] = Some(20);
    table[OpCode::EXTCODECOPY.to_usize()] = Some(20);
    table[OpCode::BLOCKHASH.to_usize()] = Some(20);
    table[OpCode::COINBASE.to_usize()] = Some(2);
    table[OpCode::TIMESTAMP.to_usize()] = Some(2);
    table[OpCode::NUMBER.to_usize()] = Some(2);
    table[OpCode::DIFFICULTY.to_usize()] = Some(2);
    table[OpCode::GASLIMIT.to_usize()] = Some(2);
    table[OpCode::POP.to_usize()] = Some(2);
    table[OpCode::MLOAD.to_usize()] = Some(3);
    table[OpCode::MSTORE.to_usize()] = Some(3);
    table[OpCode::MSTORE8.to_usize()] = Some(3);
    table[OpCode::SLOAD.to_usize()] = Some(50);
    table[OpCode::SSTORE.to_usize()] = Some(0);
    table[OpCode::JUMP.to_usize()] = Some(8);
    table[OpCode::JUMPI.to_usize()] = Some(10);
    table[OpCode::PC.to_usize()] = Some(2);
    table[OpCode::MSIZE.to_usize()] = Some(2);
    table[OpCode::GAS.to_usize()] = Some(2);
    table[OpCode::JUMPDEST.to_usize()] = Some(1);

    for op in OpCode::PUSH1.to_usize()..=OpCode::PUSH32.to_usize() {
        table[op] = Some(3);
    }

    for op in OpCode::DUP1.to_usize()..=OpCode::DUP16.to_usize() {
        table[op] = Some(3);
    }

    for op in OpCode::SWAP1.to_usize()..=OpCode::SWAP16.to_usize() {
        table[op] = Some(3);
    }

    for (i, op) in (OpCode::LOG0.to_usize()..=OpCode::LOG4.to_usize())
        .into_iter()
        .enumerate()
    {
        table[op] = Some((1 + i as u16) * 375);
    }

    table[OpCode::CREATE.to_usize()] = Some(32000);
    table[OpCode::CALL.to_usize()] = Some(40);
    table[OpCode::CALLCODE.to_usize()] = Some(40);
    table[OpCode::RETURN.to_usize()] = Some(0);
    table[OpCode::INVALID.to_usize()] = Some(0);
    table[OpCode::SELFDESTRUCT.to_usize()] = Some(0);

    table
});

static HOMESTEAD_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *FRONTIER_GAS_COSTS;
    table[OpCode::DELEGATECALL.to_usize()] = Some(40);
    table
});

/// Byzantium folds in the Tangerine Whistle (EIP-150) and Spurious Dragon
/// repricings of the revisions this implementation does not enumerate.
static BYZANTIUM_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *HOMESTEAD_GAS_COSTS;
    table[OpCode::BALANCE.to_usize()] = Some(400);
    table[OpCode::EXTCODESIZE.to_usize()] = Some(700);
    table[OpCode::EXTCODECOPY.to_usize()] = Some(700);
    table[OpCode::SLOAD.to_usize()] = Some(200);
    table[OpCode::CALL.to_usize()] = Some(700);
    table[OpCode::CALLCODE.to_usize()] = Some(700);
    table[OpCode::DELEGATECALL.to_usize()] = Some(700);
    table[OpCode::SELFDESTRUCT.to_usize()] = Some(5000);
    table[OpCode::RETURNDATASIZE.to_usize()] = Some(2);
    table[OpCode::RETURNDATACOPY.to_usize()] = Some(3);
    table[OpCode::STATICCALL.to_usize()] = Some(700);
    table[OpCode::REVERT.to_usize()] = Some(0);
    table
});

static CONSTANTINOPLE_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *BYZANTIUM_GAS_COSTS;
    table[OpCode::SHL.to_usize()] = Some(3);
    table[OpCode::SHR.to_usize()] = Some(3);
    table[OpCode::SAR.to_usize()] = Some(3);
    table[OpCode::EXTCODEHASH.to_usize()] = Some(400);
    table[OpCode::CREATE2.to_usize()] = Some(32000);
    table
});

static ISTANBUL_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *CONSTANTINOPLE_GAS_COSTS;
    table[OpCode::BALANCE.to_usize()] = Some(700);
    table[OpCode::CHAINID.to_usize()] = Some(2);
    table[OpCode::EXTCODEHASH.to_usize()] = Some(700);
    table[OpCode::SELFBALANCE.to_usize()] = Some(5);
    table[OpCode::SLOAD.to_usize()] = Some(800);
    table
});

static BERLIN_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *ISTANBUL_GAS_COSTS;
    table[OpCode::EXTCODESIZE.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::EXTCODECOPY.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::EXTCODEHASH.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::BALANCE.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::CALL.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::CALLCODE.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::DELEGATECALL.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::STATICCALL.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::SLOAD.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table
});

static LONDON_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *BERLIN_GAS_COSTS;
    table[OpCode::BASEFEE.to_usize()] = Some(2);
    table
});

static SHANGHAI_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *LONDON_GAS_COSTS;
    table[OpCode::PUSH0.to_usize()] = Some(2);
    table
});

static CANCUN_GAS_COSTS: Lazy<[Option<u16>; 256]> = Lazy::new(|| {
    let mut table = *SHANGHAI_GAS_COSTS;
    table[OpCode::TLOAD.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::TSTORE.to_usize()] = Some(WARM_STORAGE_READ_COST);
    table[OpCode::MCOPY.to_usize()] = Some(3);
    table[OpCode::BLOBHASH.to_usize()] = Some(3);
    table[OpCode::BLOBBASEFEE.to_usize()] = Some(2);
    table
});

pub fn gas_costs(revision: Revision) -> &'static [Option<u16>; 256] {
    match revision {
        Revision::Frontier => &FRONTIER_GAS_COSTS,
        Revision::Homestead => &HOMESTEAD_GAS_COSTS,
        Revision::Byzantium => &BYZANTIUM_GAS_COSTS,
        Revision::Constantinople => &CONSTANTINOPLE_GAS_COSTS,
        Revision::Istanbul => &ISTANBUL_GAS_COSTS,
        Revision::Berlin => &BERLIN_GAS_COSTS,
        Revision::London | Revision::Merge => &LONDON_GAS_COSTS,
        Revision::Shanghai => &SHANGHAI_GAS_COSTS,
        Revision::Cancun => &CANCUN_GAS_COSTS,
    }
}
