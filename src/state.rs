use crate::common::{Message, Revision};
use arrayvec::ArrayVec;
use bytes::Bytes;
use ethereum_types::U256;
use getset::{Getters, MutGetters};
use std::{cell::RefCell, rc::Rc};

const SIZE: usize = 1024;

/// EVM stack.
#[derive(Clone, Debug, Default)]
pub struct Stack(pub ArrayVec<U256, SIZE>);

impl Stack {
    pub const fn limit() -> usize {
        SIZE
    }

    fn get_pos(&self, pos: usize) -> usize {
        self.len() - 1 - pos
    }

    pub fn get(&self, pos: usize) -> &U256 {
        &self.0[self.get_pos(pos)]
    }

    pub fn get_mut(&mut self, pos: usize) -> &mut U256 {
        let pos = self.get_pos(pos);
        &mut self.0[pos]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push without a capacity check; block admission guarantees room for
    /// the block's maximum stack growth.
    pub fn push(&mut self, v: U256) {
        unsafe { self.0.push_unchecked(v) }
    }

    pub fn pop(&mut self) -> U256 {
        self.0.pop().expect("underflow")
    }

    pub fn swap_top(&mut self, pos: usize) {
        let top = self.0.len() - 1;
        let pos = self.get_pos(pos);
        self.0.swap(top, pos);
    }
}

/// Number of 32-byte words required to hold `size_in_bytes`.
#[inline]
pub(crate) fn num_words(size_in_bytes: usize) -> i64 {
    ((size_in_bytes as i64) + 31) / 32
}

/// EVM memory: a lazily expanded, zero-initialized byte buffer whose
/// observable size is always a multiple of 32.
///
/// Frames may share one allocation: a child view starts at a checkpoint
/// past the parent's visible region, observes none of the parent's bytes,
/// and pays expansion costs from zero. The quadratic cost of the current
/// size is cached so sequential expansions only compute the delta.
#[derive(Clone, Debug)]
pub struct Memory {
    shared: Rc<RefCell<Vec<u8>>>,
    checkpoint: usize,
    len: usize,
    cost: i64,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Vec::with_capacity(4 * 1024))),
            checkpoint: 0,
            len: 0,
            cost: 0,
        }
    }

    /// An isolated view for a child frame, backed by the same allocation.
    ///
    /// The parent must not be used again until the child view is dropped.
    pub fn child(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            checkpoint: self.checkpoint + self.len,
            len: 0,
            cost: 0,
        }
    }

    /// Observable size, relative to this view's checkpoint.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Gas to expand the visible region to hold `end` bytes: the delta of
    /// `3w + w²/512` over the current size.
    pub(crate) fn expansion_gas(&self, end: usize) -> i64 {
        let words = num_words(end);
        3 * words + words * words / 512 - self.cost
    }

    /// Zero-extend the visible region to hold `end` bytes, rounded up to a
    /// word boundary. Never shrinks.
    pub fn grow(&mut self, end: usize) {
        let new_len = (num_words(end) * 32) as usize;
        if new_len <= self.len {
            return;
        }

        let mut buffer = self.shared.borrow_mut();
        let new_abs = self.checkpoint + new_len;
        if buffer.len() < new_abs {
            buffer.resize(new_abs, 0);
        }
        // The region may hold stale bytes of an abandoned child view.
        buffer[self.checkpoint + self.len..new_abs].fill(0);

        self.len = new_len;
        let words = num_words(new_len);
        self.cost = 3 * words + words * words / 512;
    }

    pub fn load_word(&self, offset: usize) -> U256 {
        debug_assert!(offset + 32 <= self.len);
        let buffer = self.shared.borrow();
        let abs = self.checkpoint + offset;
        U256::from_big_endian(&buffer[abs..abs + 32])
    }

    pub fn store_word(&mut self, offset: usize, value: U256) {
        let mut b = [0; 32];
        value.to_big_endian(&mut b);
        self.store(offset, &b);
    }

    pub fn store(&mut self, offset: usize, data: &[u8]) {
        debug_assert!(offset + data.len() <= self.len);
        let abs = self.checkpoint + offset;
        self.shared.borrow_mut()[abs..abs + data.len()].copy_from_slice(data);
    }

    pub fn store_byte(&mut self, offset: usize, value: u8) {
        debug_assert!(offset < self.len);
        self.shared.borrow_mut()[self.checkpoint + offset] = value;
    }

    pub fn fill_zero(&mut self, offset: usize, len: usize) {
        debug_assert!(offset + len <= self.len);
        let abs = self.checkpoint + offset;
        self.shared.borrow_mut()[abs..abs + len].fill(0);
    }

    pub fn to_vec(&self, offset: usize, len: usize) -> Vec<u8> {
        debug_assert!(offset + len <= self.len);
        let buffer = self.shared.borrow();
        let abs = self.checkpoint + offset;
        buffer[abs..abs + len].to_vec()
    }

    /// Copy within the visible region; the ranges may overlap.
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) {
        debug_assert!(src + len <= self.len && dst + len <= self.len);
        let mut buffer = self.shared.borrow_mut();
        let src = self.checkpoint + src;
        let dst = self.checkpoint + dst;
        buffer.copy_within(src..src + len, dst);
    }
}

/// EVM execution state.
#[derive(Debug, Getters, MutGetters)]
pub struct ExecutionState {
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) gas_left: i64,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) stack: Stack,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) memory: Memory,
    pub(crate) message: Message,
    pub(crate) evm_revision: Revision,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) return_data: Bytes,
    pub(crate) output_data: Bytes,
    /// Static gas of the current block, pre-deducted by BEGINBLOCK; used to
    /// reconstruct the sequential gas counter for GAS and the call family.
    pub(crate) current_block_cost: u32,
}

impl ExecutionState {
    pub fn new(message: Message, evm_revision: Revision) -> Self {
        Self::with_memory(message, evm_revision, Memory::new())
    }

    /// State whose memory is a view provided by the embedder, e.g. a child
    /// view of the calling frame's allocation.
    pub fn with_memory(message: Message, evm_revision: Revision, memory: Memory) -> Self {
        Self {
            gas_left: message.gas,
            stack: Default::default(),
            memory,
            message,
            evm_revision,
            return_data: Default::default(),
            output_data: Bytes::new(),
            current_block_cost: 0,
        }
    }
}
