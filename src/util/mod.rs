//! Test utilities: a bytecode builder, an in-memory host and the
//! [`EvmTester`] harness.

mod bytecode;
mod mocked_host;
mod tester;

pub use self::{bytecode::*, mocked_host::*, tester::*};
