use crate::state::*;
use ethereum_types::U256;

/// Fused constant arithmetic: `PUSH k; op` collapsed into one instruction.
/// The immediate is the top operand.
#[inline]
pub(crate) fn fused_push_op(stack: &mut Stack, value: U256, op: fn(&mut Stack)) {
    stack.push(value);
    op(stack);
}

/// Fused `DUP1; SWAP1`: after DUP1 the top two items are equal, so the swap
/// reduces to the duplication alone.
#[inline]
pub(crate) fn dupswap(stack: &mut Stack) {
    dup(stack, 1);
}

pub(crate) fn dup(stack: &mut Stack, height: usize) {
    stack.push(*stack.get(height - 1));
}

pub(crate) fn swap(stack: &mut Stack, height: usize) {
    stack.swap_top(height);
}

pub(crate) fn pop(stack: &mut Stack) {
    stack.pop();
}
