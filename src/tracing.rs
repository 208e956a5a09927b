use crate::{
    common::{Message, Output, Revision},
    opcode::OpCode,
    state::ExecutionState,
};

/// Hooks into execution progress.
///
/// Instruction notifications carry the bytecode offset the instruction was
/// emitted from; synthetic block entries report their block's first offset.
pub trait Tracer {
    /// Set to true if this tracer does nothing; notifications are then
    /// compiled out of the dispatch loop.
    const DUMMY: bool = false;

    fn notify_execution_start(&mut self, revision: Revision, message: &Message, code: &[u8]);
    fn notify_instruction_start(&mut self, pc: usize, opcode: OpCode, state: &ExecutionState);
    fn notify_execution_end(&mut self, output: &Output);
}

/// Tracer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    const DUMMY: bool = true;

    fn notify_execution_start(&mut self, _: Revision, _: &Message, _: &[u8]) {}
    fn notify_instruction_start(&mut self, _: usize, _: OpCode, _: &ExecutionState) {}
    fn notify_execution_end(&mut self, _: &Output) {}
}

/// Tracer that prints to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutTracer;

impl Tracer for StdoutTracer {
    fn notify_execution_start(&mut self, revision: Revision, message: &Message, code: &[u8]) {
        println!(
            "Executing under {}: gas {}, depth {}, code {}",
            revision,
            message.gas,
            message.depth,
            hex::encode(code)
        );
    }

    fn notify_instruction_start(&mut self, pc: usize, opcode: OpCode, state: &ExecutionState) {
        println!(
            "{:>5} {:<14} gas_left={} stack_height={}",
            pc,
            opcode.to_string(),
            state.gas_left(),
            state.stack().len()
        );
    }

    fn notify_execution_end(&mut self, output: &Output) {
        println!(
            "Execution ended: {}, gas left {}, output {}",
            output.status_code,
            output.gas_left,
            hex::encode(&output.output_data)
        );
    }
}
