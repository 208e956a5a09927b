#![doc = include_str!("../README.md")]

pub use access_list::AccessList;
pub use analysis::{AnalysisError, AnalyzedCode};
pub use cache::AnalysisCache;
pub use common::{
    create2_address, create_address, CallKind, Message, Output, Revision, StatusCode,
    SuccessfulOutput,
};
pub use host::Host;
pub use opcode::OpCode;
pub use state::{ExecutionState, Memory, Stack};

/// Maximum allowed EVM bytecode size ([EIP-170](https://eips.ethereum.org/EIPS/eip-170)).
pub const MAX_CODE_SIZE: usize = 0x6000;

/// Maximum allowed contract creation code size ([EIP-3860](https://eips.ethereum.org/EIPS/eip-3860)).
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// Hard cap on addressable memory within a single frame.
pub const MEMORY_LIMIT: usize = u32::MAX as usize;

/// EVM call stack depth limit.
pub const CALL_DEPTH_LIMIT: i32 = 1024;

mod access_list;
mod analysis;
mod cache;
mod common;
pub mod host;
#[doc(hidden)]
pub mod instructions;
mod interpreter;
pub mod opcode;
mod state;
mod stream;
pub mod tracing;

#[cfg(feature = "util")]
pub mod util;
