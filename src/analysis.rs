use crate::{
    common::Revision,
    instructions::instruction_table::{get_instruction_table, InstructionTable},
    opcode::OpCode,
    stream::*,
    MAX_INITCODE_SIZE,
};
use bytes::Bytes;
use ethereum_types::{H256, U256};
use sha3::{Digest, Keccak256};
use std::cmp::min;
use strum_macros::Display;

/// Analysis failure.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum AnalysisError {
    /// The bytecode exceeds the initcode size cap.
    #[strum(serialize = "code too large")]
    CodeTooLarge,
    /// The emitted instruction count exceeded the defensive bound.
    #[strum(serialize = "analysis budget exceeded")]
    BudgetExceeded,
}

impl std::error::Error for AnalysisError {}

/// Defensive cap on the emitted instruction count: every bytecode position,
/// a block entry for each, and the sentinel.
const INSTRUCTION_BUDGET: usize = 2 * MAX_INITCODE_SIZE + 2;

/// JUMPDEST offsets packed into a sorted array, checked by a bounded linear
/// search starting from a position proportional to the queried offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct JumpdestSet {
    offsets: Box<[u16]>,
    code_len: usize,
}

impl JumpdestSet {
    fn from_bitmap(bitmap: &[bool]) -> Self {
        Self {
            offsets: bitmap
                .iter()
                .enumerate()
                .filter(|(_, is_dest)| **is_dest)
                .map(|(pc, _)| pc as u16)
                .collect(),
            code_len: bitmap.len(),
        }
    }

    pub(crate) fn contains(&self, dst: U256) -> bool {
        if self.offsets.is_empty() || dst >= U256::from(self.code_len) {
            return false;
        }
        let pc = dst.as_usize() as u16;

        let mut i = min(
            pc as usize * self.offsets.len() / self.code_len,
            self.offsets.len() - 1,
        );
        while i + 1 < self.offsets.len() && self.offsets[i] < pc {
            i += 1;
        }
        while i > 0 && self.offsets[i] > pc {
            i -= 1;
        }
        self.offsets[i] == pc
    }
}

/// Code with analysis: the instruction stream, its payload arenas, the
/// packed jump destinations and the pc maps. Immutable after construction
/// and safe to share between concurrent executions.
#[derive(Clone, Debug)]
pub struct AnalyzedCode {
    pub(crate) headers: Box<[Header]>,
    pub(crate) thin: Box<[Thin]>,
    pub(crate) mid: Box<[Mid]>,
    pub(crate) wide: Box<[Wide]>,
    pub(crate) jumpdests: JumpdestSet,
    pub(crate) pc_to_block_start: Box<[u32]>,
    pub(crate) inst_to_pc: Box<[u32]>,
    pub(crate) code: Bytes,
    code_hash: H256,
    revision: Revision,
}

impl AnalyzedCode {
    /// Analyze code and prepare it for execution under the given revision.
    pub fn analyze(code: impl AsRef<[u8]>, revision: Revision) -> Result<Self, AnalysisError> {
        let code = code.as_ref();
        if code.len() > MAX_INITCODE_SIZE {
            return Err(AnalysisError::CodeTooLarge);
        }

        // Classify code vs PUSH immediate bytes and find the jump
        // destinations.
        let mut jumpdest_bitmap = vec![false; code.len()];
        let mut pc = 0;
        while pc < code.len() {
            let op = OpCode(code[pc]);
            if op == OpCode::JUMPDEST {
                jumpdest_bitmap[pc] = true;
            }
            pc += 1 + op.immediate_size();
        }

        let mut planner = Planner {
            table: get_instruction_table(revision),
            jumpdest_bitmap,
            headers: vec![],
            thin: vec![],
            mid: vec![],
            wide: vec![],
            inst_to_pc: vec![],
            pc_to_block_start: vec![SENTINEL; code.len()],
            pending_jumps: vec![],
            block: Block::default(),
        };
        planner.emit(code)?;

        let Planner {
            jumpdest_bitmap,
            headers,
            thin,
            mid,
            wide,
            inst_to_pc,
            pc_to_block_start,
            ..
        } = planner;

        debug_assert_eq!(headers.len(), thin.len() + mid.len() + wide.len());

        Ok(Self {
            headers: headers.into(),
            thin: thin.into(),
            mid: mid.into(),
            wide: wide.into(),
            jumpdests: JumpdestSet::from_bitmap(&jumpdest_bitmap),
            pc_to_block_start: pc_to_block_start.into(),
            inst_to_pc: inst_to_pc.into(),
            code: Bytes::copy_from_slice(code),
            code_hash: H256::from_slice(&Keccak256::digest(code)),
            revision,
        })
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn code_hash(&self) -> H256 {
        self.code_hash
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }
}

/// Accumulator for the basic block being emitted.
#[derive(Clone, Copy, Debug, Default)]
struct Block {
    /// Header index of the open block's BEGINBLOCK.
    header_index: usize,
    /// Payload index of the open block's BEGINBLOCK.
    payload_index: usize,
    /// Sum of base gas costs so far.
    gas: u64,
    /// Minimum inbound stack height.
    stack_req: i32,
    /// Stack height change relative to block entry.
    stack_change: i32,
    /// Maximum observed stack growth relative to block entry.
    stack_max_growth: i32,
    /// Whether any instruction was accounted to this block yet.
    tracked: bool,
}

enum PendingSlot {
    Mid(usize),
    Wide(usize),
}

struct Planner {
    table: &'static InstructionTable,
    jumpdest_bitmap: Vec<bool>,
    headers: Vec<Header>,
    thin: Vec<Thin>,
    mid: Vec<Mid>,
    wide: Vec<Wide>,
    inst_to_pc: Vec<u32>,
    pc_to_block_start: Vec<u32>,
    /// Jump payloads whose target pc still needs conversion to an
    /// instruction index; forward targets do not exist while emitting.
    pending_jumps: Vec<(PendingSlot, u16)>,
    block: Block,
}

impl Planner {
    fn emit(&mut self, code: &[u8]) -> Result<(), AnalysisError> {
        self.open_block(0);

        let mut pc = 0;
        let mut block_terminated = false;
        let mut prev_push: Option<U256> = None;

        while pc < code.len() {
            if self.headers.len() > INSTRUCTION_BUDGET {
                return Err(AnalysisError::BudgetExceeded);
            }

            let op = OpCode(code[pc]);

            if block_terminated || (self.jumpdest_bitmap[pc] && self.block.tracked) {
                self.close_block();
                self.open_block(pc);
                block_terminated = false;
                // A constant on the stack is only known within its block;
                // the new block can also be entered by a jump.
                prev_push = None;
            }
            let prev = prev_push.take();
            if self.jumpdest_bitmap[pc] {
                self.pc_to_block_start[pc] = self.block.header_index as u32;
            }

            let metrics = match self.table[op.to_usize()] {
                Some(metrics) => metrics,
                None => {
                    self.emit_thin(pc, OpCode::UNDEFINED, op.to_u8());
                    pc += 1;
                    continue;
                }
            };
            self.track(metrics.stack_height_required, metrics.stack_height_change);
            self.block.gas += u64::from(metrics.gas_cost);

            match op {
                // The block entry validation subsumes the opcode itself.
                OpCode::JUMPDEST => {}

                OpCode::PUSH0 => {
                    self.emit_wide(pc, op, SENTINEL, U256::zero());
                    prev_push = Some(U256::zero());
                }

                op if op.immediate_size() > 0 => {
                    let n = op.immediate_size();
                    let imm_end = min(pc + 1 + n, code.len());

                    // A truncated immediate reads as if the code were
                    // zero-padded on the right.
                    let mut buf = [0_u8; 32];
                    buf[32 - n..32 - n + (imm_end - pc - 1)]
                        .copy_from_slice(&code[pc + 1..imm_end]);
                    let value = U256::from_big_endian(&buf);

                    let next_pc = pc + 1 + n;
                    if let Some(fused_op) = self.fusable_successor(code, next_pc, value) {
                        let next_metrics = self.table[code[next_pc] as usize].unwrap();
                        self.track(
                            next_metrics.stack_height_required,
                            next_metrics.stack_height_change,
                        );
                        self.block.gas += u64::from(next_metrics.gas_cost);

                        let slot = self.emit_wide(pc, fused_op, SENTINEL, value);
                        if fused_op == OpCode::PUSHJUMP || fused_op == OpCode::PUSHJUMPI {
                            self.pending_jumps
                                .push((PendingSlot::Wide(slot), value.as_usize() as u16));
                            block_terminated = true;
                        }
                        pc = next_pc + 1;
                        continue;
                    }

                    self.emit_wide(pc, op, SENTINEL, value);
                    prev_push = Some(value);
                    pc = next_pc;
                    continue;
                }

                OpCode::JUMP | OpCode::JUMPI => {
                    let slot = self.emit_mid(pc, op, pack_pair(SENTINEL, pc as u32));
                    // A constant jump target that is a known destination is
                    // resolved now; the pop still happens at run time.
                    if let Some(value) = prev {
                        if self.is_known_jumpdest(value) {
                            self.pending_jumps
                                .push((PendingSlot::Mid(slot), value.as_usize() as u16));
                        }
                    }
                    block_terminated = true;
                }

                OpCode::ISZERO if self.fuses_with(code, pc + 1, OpCode::ISZERO) => {
                    let next_metrics = self.table[OpCode::ISZERO.to_usize()].unwrap();
                    self.track(
                        next_metrics.stack_height_required,
                        next_metrics.stack_height_change,
                    );
                    self.block.gas += u64::from(next_metrics.gas_cost);
                    self.emit_thin(pc, OpCode::ISZERO2, 0);
                    pc += 2;
                    continue;
                }

                OpCode::DUP1 if self.fuses_with(code, pc + 1, OpCode::SWAP1) => {
                    let next_metrics = self.table[OpCode::SWAP1.to_usize()].unwrap();
                    self.track(
                        next_metrics.stack_height_required,
                        next_metrics.stack_height_change,
                    );
                    self.block.gas += u64::from(next_metrics.gas_cost);
                    self.emit_thin(pc, OpCode::DUPSWAP, 0);
                    pc += 2;
                    continue;
                }

                OpCode::GAS
                | OpCode::CALL
                | OpCode::CALLCODE
                | OpCode::DELEGATECALL
                | OpCode::STATICCALL
                | OpCode::CREATE
                | OpCode::CREATE2 => {
                    // The block gas prefix at this point, own base cost
                    // included, reconstructs the sequential gas counter.
                    let prefix = min(self.block.gas, u64::from(u32::MAX)) as u32;
                    self.emit_mid(pc, op, pack_pair(prefix, pc as u32));
                }

                OpCode::PC => {
                    self.emit_mid(pc, op, pc as u64);
                }

                op if (OpCode::DUP1..=OpCode::DUP16).contains(&op) => {
                    self.emit_thin(pc, op, op.to_u8() - OpCode::DUP1.to_u8() + 1);
                }

                op if (OpCode::SWAP1..=OpCode::SWAP16).contains(&op) => {
                    self.emit_thin(pc, op, op.to_u8() - OpCode::SWAP1.to_u8() + 1);
                }

                op if (OpCode::LOG0..=OpCode::LOG4).contains(&op) => {
                    self.emit_thin(pc, op, op.to_u8() - OpCode::LOG0.to_u8());
                }

                _ => {
                    self.emit_thin(pc, op, 0);
                    if matches!(
                        op,
                        OpCode::STOP | OpCode::RETURN | OpCode::REVERT | OpCode::SELFDESTRUCT
                    ) {
                        block_terminated = true;
                    }
                }
            }

            pc += 1;
        }

        // Sentinel STOP; falling off the end of the code halts.
        if block_terminated {
            self.close_block();
            self.open_block(code.len());
        }
        self.emit_thin(code.len(), OpCode::STOP, 0);
        self.close_block();

        if self.headers.len() > INSTRUCTION_BUDGET {
            return Err(AnalysisError::BudgetExceeded);
        }

        // Convert recorded jump target pcs into instruction indices.
        for (slot, target_pc) in std::mem::take(&mut self.pending_jumps) {
            let target = self.pc_to_block_start[target_pc as usize];
            debug_assert_ne!(target, SENTINEL);
            match slot {
                PendingSlot::Mid(i) => {
                    self.mid[i].imm = pack_pair(target, imm_lo(self.mid[i].imm))
                }
                PendingSlot::Wide(i) => self.wide[i].aux = target,
            }
        }

        Ok(())
    }

    fn is_known_jumpdest(&self, value: U256) -> bool {
        value < U256::from(self.jumpdest_bitmap.len()) && self.jumpdest_bitmap[value.as_usize()]
    }

    /// Whether the instruction at `pc` is `op` and may be folded into its
    /// predecessor: it must exist, be defined, and not sit on a block
    /// boundary someone could jump to.
    fn fuses_with(&self, code: &[u8], pc: usize, op: OpCode) -> bool {
        pc < code.len() && code[pc] == op.to_u8() && !self.jumpdest_bitmap[pc]
    }

    fn fusable_successor(&self, code: &[u8], pc: usize, push_value: U256) -> Option<OpCode> {
        if pc >= code.len() || self.jumpdest_bitmap[pc] {
            return None;
        }
        match OpCode(code[pc]) {
            OpCode::ADD => Some(OpCode::PUSHADD),
            OpCode::SUB => Some(OpCode::PUSHSUB),
            OpCode::MUL => Some(OpCode::PUSHMUL),
            OpCode::DIV => Some(OpCode::PUSHDIV),
            OpCode::JUMP if self.is_known_jumpdest(push_value) => Some(OpCode::PUSHJUMP),
            OpCode::JUMPI if self.is_known_jumpdest(push_value) => Some(OpCode::PUSHJUMPI),
            _ => None,
        }
    }

    fn track(&mut self, stack_required: u8, stack_change: i8) {
        let req = i32::from(stack_required) - self.block.stack_change;
        if req > self.block.stack_req {
            self.block.stack_req = req;
        }
        self.block.stack_change += i32::from(stack_change);
        if self.block.stack_change > self.block.stack_max_growth {
            self.block.stack_max_growth = self.block.stack_change;
        }
        self.block.tracked = true;
    }

    fn open_block(&mut self, pc: usize) {
        let header_index = self.headers.len();
        let payload_index = self.emit_mid(pc, OpCode::BEGINBLOCK, 0);
        self.block = Block {
            header_index,
            payload_index,
            ..Default::default()
        };
    }

    fn close_block(&mut self) {
        let info = BlockInfo {
            static_gas: min(self.block.gas, u64::from(u32::MAX)) as u32,
            stack_req: self.block.stack_req.clamp(0, i32::from(u16::MAX)) as u16,
            stack_max_growth: self.block.stack_max_growth.clamp(0, i32::from(u16::MAX)) as u16,
        };
        self.mid[self.block.payload_index].imm = info.pack();
    }

    fn emit_thin(&mut self, pc: usize, op: OpCode, arg: u8) -> usize {
        let next = self.headers.len() as u32 + 1;
        self.thin.push(Thin { op, arg, next });
        self.push_header(Bucket::Thin, self.thin.len() - 1, pc);
        self.thin.len() - 1
    }

    fn emit_mid(&mut self, pc: usize, op: OpCode, imm: u64) -> usize {
        let next = self.headers.len() as u32 + 1;
        self.mid.push(Mid { op, next, imm });
        self.push_header(Bucket::Mid, self.mid.len() - 1, pc);
        self.mid.len() - 1
    }

    fn emit_wide(&mut self, pc: usize, op: OpCode, aux: u32, value: U256) -> usize {
        let next = self.headers.len() as u32 + 1;
        self.wide.push(Wide {
            op,
            next,
            aux,
            value,
        });
        self.push_header(Bucket::Wide, self.wide.len() - 1, pc);
        self.wide.len() - 1
    }

    fn push_header(&mut self, bucket: Bucket, id: usize, pc: usize) {
        self.headers.push(Header::new(bucket, id));
        self.inst_to_pc.push(pc as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn analyze(code: &[u8]) -> AnalyzedCode {
        AnalyzedCode::analyze(code, Revision::latest()).unwrap()
    }

    fn ops(analysis: &AnalyzedCode) -> Vec<OpCode> {
        analysis
            .headers
            .iter()
            .map(|h| match h.bucket() {
                Bucket::Thin => analysis.thin[h.id()].op,
                Bucket::Mid => analysis.mid[h.id()].op,
                Bucket::Wide => analysis.wide[h.id()].op,
            })
            .collect()
    }

    fn first_block(analysis: &AnalyzedCode) -> BlockInfo {
        assert_eq!(analysis.headers[0].bucket(), Bucket::Mid);
        let payload = analysis.mid[analysis.headers[0].id()];
        assert_eq!(payload.op, OpCode::BEGINBLOCK);
        BlockInfo::unpack(payload.imm)
    }

    #[test]
    fn empty_code_yields_stop() {
        let analysis = analyze(&[]);
        assert_eq!(ops(&analysis), vec![OpCode::BEGINBLOCK, OpCode::STOP]);
        assert_eq!(first_block(&analysis), BlockInfo::default());
    }

    #[test]
    fn block_metadata_sums_gas_and_bounds() {
        // PUSH1 1; PUSH1 1; ADD
        let analysis = analyze(&hex!("6001600101"));
        let block = first_block(&analysis);
        assert_eq!(block.static_gas, 9);
        assert_eq!(block.stack_req, 0);
        assert_eq!(block.stack_max_growth, 2);

        // Second PUSH and ADD fuse.
        assert_eq!(
            ops(&analysis),
            vec![
                OpCode::BEGINBLOCK,
                OpCode::PUSH1,
                OpCode::PUSHADD,
                OpCode::STOP
            ]
        );
    }

    #[test]
    fn stack_req_tracks_deficit() {
        // ADD needs two items, then SUB needs two more below the result.
        let analysis = analyze(&hex!("0103"));
        let block = first_block(&analysis);
        assert_eq!(block.stack_req, 3);
        assert_eq!(block.stack_max_growth, 0);
    }

    #[test]
    fn truncated_push_is_zero_padded() {
        // PUSH3 with two immediate bytes.
        let analysis = analyze(&hex!("62aabb"));
        let value = analysis.wide[analysis.headers[1].id()].value;
        assert_eq!(value, U256::from(0xaabb00_u64));
    }

    #[test]
    fn jumpdests_are_packed_and_searchable() {
        // JUMPDEST; PUSH2 (data contains 0x5b); JUMPDEST
        let code = hex!("5b615b5b005b");
        let analysis = analyze(&code);

        assert!(analysis.jumpdests.contains(0.into()));
        assert!(analysis.jumpdests.contains(5.into()));
        // Immediate data is not code.
        assert!(!analysis.jumpdests.contains(2.into()));
        assert!(!analysis.jumpdests.contains(3.into()));
        assert!(!analysis.jumpdests.contains(4.into()));
        assert!(!analysis.jumpdests.contains(6.into()));
        assert!(!analysis.jumpdests.contains(U256::max_value()));

        for pc in [0_usize, 5] {
            let idx = analysis.pc_to_block_start[pc];
            assert_ne!(idx, SENTINEL);
            let header = analysis.headers[idx as usize];
            assert_eq!(header.bucket(), Bucket::Mid);
            assert_eq!(analysis.mid[header.id()].op, OpCode::BEGINBLOCK);
        }
    }

    #[test]
    fn proportional_search_over_many_destinations() {
        let mut code = Vec::new();
        for _ in 0..100 {
            code.push(OpCode::JUMPDEST.to_u8());
            code.extend_from_slice(&hex!("600101")); // PUSH1 1; ADD
        }
        let analysis = analyze(&code);

        for pc in 0..code.len() {
            assert_eq!(
                analysis.jumpdests.contains(pc.into()),
                pc % 4 == 0,
                "pc {}",
                pc
            );
        }
    }

    #[test]
    fn constant_jump_is_fused_and_resolved() {
        // PUSH1 4; JUMP; INVALID; JUMPDEST; STOP
        let analysis = analyze(&hex!("600456fe5b00"));
        let stream = ops(&analysis);
        assert!(stream.contains(&OpCode::PUSHJUMP));

        let wide = analysis
            .wide
            .iter()
            .find(|w| w.op == OpCode::PUSHJUMP)
            .unwrap();
        assert_eq!(wide.aux, analysis.pc_to_block_start[4]);
        assert_ne!(wide.aux, SENTINEL);
    }

    #[test]
    fn push0_jump_resolves_without_fusion() {
        // JUMPDEST; PUSH0; JUMP -- an infinite loop to offset 0. PUSH0
        // does not participate in fusion, but the constant still resolves
        // the jump.
        let analysis = analyze(&hex!("5b5f56"));
        let stream = ops(&analysis);
        assert!(!stream.contains(&OpCode::PUSHJUMP));

        let jump = analysis.mid.iter().find(|m| m.op == OpCode::JUMP).unwrap();
        assert_eq!(imm_hi(jump.imm), analysis.pc_to_block_start[0]);
        assert_ne!(imm_hi(jump.imm), SENTINEL);
    }

    #[test]
    fn jump_preceded_by_block_boundary_stays_unresolved() {
        // PUSH1 2; JUMPDEST; JUMP -- the JUMP sits in a block that can be
        // entered directly with an arbitrary stack top, so the constant
        // from the previous block must not resolve it.
        let analysis = analyze(&hex!("60025b565b00"));
        let jump = analysis.mid.iter().find(|m| m.op == OpCode::JUMP).unwrap();
        assert_eq!(imm_hi(jump.imm), SENTINEL);
    }

    #[test]
    fn computed_jump_stays_unresolved() {
        // PUSH1 3; PUSH1 3; ADD; JUMP; JUMPDEST; STOP
        let analysis = analyze(&hex!("6003600301565b00"));
        let jump = analysis.mid.iter().find(|m| m.op == OpCode::JUMP).unwrap();
        assert_eq!(imm_hi(jump.imm), SENTINEL);
    }

    #[test]
    fn no_fusion_across_block_boundary() {
        // PUSH1 1; JUMPDEST; ADD -- the ADD is a jump destination block.
        let analysis = analyze(&hex!("60015b01"));
        let stream = ops(&analysis);
        assert!(!stream.contains(&OpCode::PUSHADD));
        assert_eq!(stream.iter().filter(|op| **op == OpCode::BEGINBLOCK).count(), 2);
    }

    #[test]
    fn iszero_pair_and_dup_swap_fuse() {
        let analysis = analyze(&hex!("15158090"));
        let stream = ops(&analysis);
        assert!(stream.contains(&OpCode::ISZERO2));
        assert!(stream.contains(&OpCode::DUPSWAP));
        // Fusion keeps the block gas of all four constituents.
        assert_eq!(first_block(&analysis).static_gas, 12);
    }

    #[test]
    fn undefined_opcodes_emit_placeholders() {
        let analysis = AnalyzedCode::analyze(hex!("5f"), Revision::London).unwrap();
        let header = analysis.headers[1];
        assert_eq!(header.bucket(), Bucket::Thin);
        let thin = analysis.thin[header.id()];
        assert_eq!(thin.op, OpCode::UNDEFINED);
        assert_eq!(thin.arg, OpCode::PUSH0.to_u8());

        let analysis = AnalyzedCode::analyze(hex!("5f"), Revision::Shanghai).unwrap();
        assert!(ops(&analysis).contains(&OpCode::PUSH0));
    }

    #[test]
    fn arena_slots_match_instruction_count() {
        let analysis = analyze(&hex!("6001600101600055345952fd"));
        assert_eq!(
            analysis.headers.len(),
            analysis.thin.len() + analysis.mid.len() + analysis.wide.len()
        );
        for header in analysis.headers.iter() {
            let in_bounds = match header.bucket() {
                Bucket::Thin => header.id() < analysis.thin.len(),
                Bucket::Mid => header.id() < analysis.mid.len(),
                Bucket::Wide => header.id() < analysis.wide.len(),
            };
            assert!(in_bounds);
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let code = hex!("60016002015b600357600456fe5b5b00");
        let a = analyze(&code);
        let b = analyze(&code);

        assert_eq!(a.headers, b.headers);
        assert_eq!(a.jumpdests, b.jumpdests);
        assert_eq!(a.pc_to_block_start, b.pc_to_block_start);
        assert_eq!(a.inst_to_pc, b.inst_to_pc);
        assert_eq!(a.code_hash, b.code_hash);
    }

    #[test]
    fn oversize_code_is_rejected() {
        let code = vec![OpCode::JUMPDEST.to_u8(); MAX_INITCODE_SIZE + 1];
        assert_eq!(
            AnalyzedCode::analyze(code, Revision::latest()).unwrap_err(),
            AnalysisError::CodeTooLarge
        );
    }
}
