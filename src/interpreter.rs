use crate::{
    analysis::AnalyzedCode,
    common::*,
    host::Host,
    instructions::{
        arithmetic, bitwise, boolean, call, control, external, memory,
        stack_manip,
        stack_manip::{dup, dupswap, fused_push_op, swap},
    },
    state::ExecutionState,
    stream::*,
    tracing::Tracer,
    OpCode, CALL_DEPTH_LIMIT, MAX_CODE_SIZE,
};
use bytes::Bytes;
use ethereum_types::U256;

impl AnalyzedCode {
    /// Execute the analyzed bytecode against the given host.
    pub fn execute<H: Host, T: Tracer>(
        &self,
        host: &mut H,
        mut tracer: T,
        message: Message,
    ) -> Output {
        self.execute_with_state(
            host,
            &mut tracer,
            ExecutionState::new(message, self.revision()),
        )
    }

    /// Execute with a caller-constructed state, e.g. one whose memory is a
    /// child view of the calling frame's allocation.
    pub fn execute_with_state<H: Host, T: Tracer>(
        &self,
        host: &mut H,
        tracer: &mut T,
        mut state: ExecutionState,
    ) -> Output {
        if !T::DUMMY {
            tracer.notify_execution_start(self.revision(), &state.message, self.code());
        }

        let output = match self.run(host, tracer, &mut state) {
            Ok(output) => output.into(),
            Err(status_code) => Output {
                status_code,
                gas_left: 0,
                output_data: Bytes::new(),
                create_address: None,
            },
        };

        if !T::DUMMY {
            tracer.notify_execution_end(&output);
        }

        output
    }

    fn run<H: Host, T: Tracer>(
        &self,
        host: &mut H,
        tracer: &mut T,
        state: &mut ExecutionState,
    ) -> Result<SuccessfulOutput, StatusCode> {
        if state.message.depth > CALL_DEPTH_LIMIT {
            return Err(StatusCode::CallDepthExceeded);
        }

        let mut reverted = false;

        let mut i = 0_usize;
        loop {
            let header = self.headers[i];

            match header.bucket() {
                Bucket::Thin => {
                    let instr = self.thin[header.id()];
                    self.trace(tracer, i, instr.op, state);

                    match instr.op {
                        OpCode::STOP => break,
                        OpCode::ADD => arithmetic::add(&mut state.stack),
                        OpCode::MUL => arithmetic::mul(&mut state.stack),
                        OpCode::SUB => arithmetic::sub(&mut state.stack),
                        OpCode::DIV => arithmetic::div(&mut state.stack),
                        OpCode::SDIV => arithmetic::sdiv(&mut state.stack),
                        OpCode::MOD => arithmetic::modulo(&mut state.stack),
                        OpCode::SMOD => arithmetic::smod(&mut state.stack),
                        OpCode::ADDMOD => arithmetic::addmod(&mut state.stack),
                        OpCode::MULMOD => arithmetic::mulmod(&mut state.stack),
                        OpCode::EXP => arithmetic::exp(state)?,
                        OpCode::SIGNEXTEND => arithmetic::signextend(&mut state.stack),
                        OpCode::LT => boolean::lt(&mut state.stack),
                        OpCode::GT => boolean::gt(&mut state.stack),
                        OpCode::SLT => boolean::slt(&mut state.stack),
                        OpCode::SGT => boolean::sgt(&mut state.stack),
                        OpCode::EQ => boolean::eq(&mut state.stack),
                        OpCode::ISZERO => boolean::iszero(&mut state.stack),
                        OpCode::ISZERO2 => boolean::iszero2(&mut state.stack),
                        OpCode::AND => boolean::and(&mut state.stack),
                        OpCode::OR => boolean::or(&mut state.stack),
                        OpCode::XOR => boolean::xor(&mut state.stack),
                        OpCode::NOT => boolean::not(&mut state.stack),
                        OpCode::BYTE => bitwise::byte(&mut state.stack),
                        OpCode::SHL => bitwise::shl(&mut state.stack),
                        OpCode::SHR => bitwise::shr(&mut state.stack),
                        OpCode::SAR => bitwise::sar(&mut state.stack),

                        OpCode::KECCAK256 => memory::keccak256(state)?,
                        OpCode::ADDRESS => external::address(state),
                        OpCode::BALANCE => external::balance(state, host)?,
                        OpCode::CALLER => external::caller(state),
                        OpCode::CALLVALUE => external::callvalue(state),
                        OpCode::CALLDATALOAD => control::calldataload(state),
                        OpCode::CALLDATASIZE => control::calldatasize(state),
                        OpCode::CALLDATACOPY => memory::calldatacopy(state)?,
                        OpCode::CODESIZE => {
                            memory::codesize(&mut state.stack, self.code())
                        }
                        OpCode::CODECOPY => memory::codecopy(state, self.code())?,
                        OpCode::EXTCODESIZE => external::extcodesize(state, host)?,
                        OpCode::EXTCODECOPY => memory::extcodecopy(state, host)?,
                        OpCode::RETURNDATASIZE => memory::returndatasize(state),
                        OpCode::RETURNDATACOPY => memory::returndatacopy(state)?,
                        OpCode::EXTCODEHASH => external::extcodehash(state, host)?,
                        OpCode::BLOCKHASH => external::blockhash(state, host)?,
                        OpCode::ORIGIN
                        | OpCode::COINBASE
                        | OpCode::GASPRICE
                        | OpCode::TIMESTAMP
                        | OpCode::NUMBER
                        | OpCode::DIFFICULTY
                        | OpCode::GASLIMIT
                        | OpCode::CHAINID
                        | OpCode::BASEFEE
                        | OpCode::BLOBBASEFEE => {
                            external::push_txcontext(
                                state,
                                host,
                                match instr.op {
                                    OpCode::ORIGIN => external::origin_accessor,
                                    OpCode::COINBASE => external::coinbase_accessor,
                                    OpCode::GASPRICE => external::gasprice_accessor,
                                    OpCode::TIMESTAMP => external::timestamp_accessor,
                                    OpCode::NUMBER => external::number_accessor,
                                    OpCode::DIFFICULTY => external::difficulty_accessor,
                                    OpCode::GASLIMIT => external::gaslimit_accessor,
                                    OpCode::CHAINID => external::chainid_accessor,
                                    OpCode::BASEFEE => external::basefee_accessor,
                                    OpCode::BLOBBASEFEE => external::blobbasefee_accessor,
                                    _ => unreachable!(),
                                },
                            )?;
                        }
                        OpCode::BLOBHASH => external::blobhash(state, host)?,
                        OpCode::SELFBALANCE => external::selfbalance(state, host)?,
                        OpCode::POP => stack_manip::pop(&mut state.stack),
                        OpCode::MLOAD => memory::mload(state)?,
                        OpCode::MSTORE => memory::mstore(state)?,
                        OpCode::MSTORE8 => memory::mstore8(state)?,
                        OpCode::MSIZE => memory::msize(state),
                        OpCode::MCOPY => memory::mcopy(state)?,
                        OpCode::SLOAD => external::sload(state, host)?,
                        OpCode::SSTORE => external::sstore(state, host)?,
                        OpCode::TLOAD => external::tload(state, host)?,
                        OpCode::TSTORE => external::tstore(state, host)?,

                        op if (OpCode::DUP1..=OpCode::DUP16).contains(&op) => {
                            dup(&mut state.stack, instr.arg as usize)
                        }
                        op if (OpCode::SWAP1..=OpCode::SWAP16).contains(&op) => {
                            swap(&mut state.stack, instr.arg as usize)
                        }
                        OpCode::DUPSWAP => dupswap(&mut state.stack),
                        op if (OpCode::LOG0..=OpCode::LOG4).contains(&op) => {
                            external::do_log(state, host, instr.arg as usize)?
                        }

                        OpCode::RETURN | OpCode::REVERT => {
                            control::ret(state)?;
                            reverted = instr.op == OpCode::REVERT;
                            if !reverted {
                                self.validate_created_code(state)?;
                            }
                            break;
                        }
                        OpCode::INVALID => return Err(StatusCode::InvalidInstruction),
                        OpCode::UNDEFINED => return Err(StatusCode::UndefinedInstruction),
                        OpCode::SELFDESTRUCT => {
                            external::selfdestruct(state, host)?;
                            break;
                        }
                        other => {
                            unreachable!("reached unhandled opcode: {}", other);
                        }
                    }

                    i = instr.next as usize;
                }

                Bucket::Mid => {
                    let instr = self.mid[header.id()];
                    self.trace(tracer, i, instr.op, state);

                    match instr.op {
                        OpCode::BEGINBLOCK => {
                            let block = BlockInfo::unpack(instr.imm);

                            state.gas_left -= i64::from(block.static_gas);
                            if state.gas_left < 0 {
                                return Err(StatusCode::OutOfGas);
                            }

                            let height = state.stack.len();
                            if height < block.stack_req as usize {
                                return Err(StatusCode::StackUnderflow);
                            }
                            if height + block.stack_max_growth as usize > crate::Stack::limit() {
                                return Err(StatusCode::StackOverflow);
                            }

                            state.current_block_cost = block.static_gas;
                            i = instr.next as usize;
                        }
                        OpCode::JUMP => {
                            i = self.jump(state, instr.imm)?;
                        }
                        OpCode::JUMPI => {
                            let target = state.stack.pop();
                            let condition = state.stack.pop();
                            i = if condition.is_zero() {
                                instr.next as usize
                            } else {
                                self.jump_to(state, imm_hi(instr.imm), target)?
                            };
                        }
                        OpCode::GAS => {
                            // The block's static gas was deducted up front;
                            // credit back the share of the instructions
                            // after this one.
                            let correction = state.current_block_cost - imm_hi(instr.imm);
                            state
                                .stack
                                .push(U256::from(state.gas_left + i64::from(correction)));
                            i = instr.next as usize;
                        }
                        OpCode::PC => {
                            state.stack.push(instr.imm.into());
                            i = instr.next as usize;
                        }
                        OpCode::CALL
                        | OpCode::CALLCODE
                        | OpCode::DELEGATECALL
                        | OpCode::STATICCALL => {
                            call::do_call(
                                state,
                                host,
                                match instr.op {
                                    OpCode::CALL | OpCode::STATICCALL => CallKind::Call,
                                    OpCode::CALLCODE => CallKind::CallCode,
                                    OpCode::DELEGATECALL => CallKind::DelegateCall,
                                    _ => unreachable!(),
                                },
                                instr.op == OpCode::STATICCALL,
                                imm_hi(instr.imm),
                            )?;
                            i = instr.next as usize;
                        }
                        OpCode::CREATE | OpCode::CREATE2 => {
                            call::do_create(
                                state,
                                host,
                                instr.op == OpCode::CREATE2,
                                imm_hi(instr.imm),
                            )?;
                            i = instr.next as usize;
                        }
                        other => {
                            unreachable!("reached unhandled opcode: {}", other);
                        }
                    }
                }

                Bucket::Wide => {
                    let instr = self.wide[header.id()];
                    self.trace(tracer, i, instr.op, state);

                    match instr.op {
                        op if op.is_push() => {
                            state.stack.push(instr.value);
                            i = instr.next as usize;
                        }
                        OpCode::PUSHADD => {
                            fused_push_op(&mut state.stack, instr.value, arithmetic::add);
                            i = instr.next as usize;
                        }
                        OpCode::PUSHSUB => {
                            fused_push_op(&mut state.stack, instr.value, arithmetic::sub);
                            i = instr.next as usize;
                        }
                        OpCode::PUSHMUL => {
                            fused_push_op(&mut state.stack, instr.value, arithmetic::mul);
                            i = instr.next as usize;
                        }
                        OpCode::PUSHDIV => {
                            fused_push_op(&mut state.stack, instr.value, arithmetic::div);
                            i = instr.next as usize;
                        }
                        OpCode::PUSHJUMP => {
                            debug_assert_ne!(instr.aux, SENTINEL);
                            i = instr.aux as usize;
                        }
                        OpCode::PUSHJUMPI => {
                            let condition = state.stack.pop();
                            i = if condition.is_zero() {
                                instr.next as usize
                            } else {
                                debug_assert_ne!(instr.aux, SENTINEL);
                                instr.aux as usize
                            };
                        }
                        other => {
                            unreachable!("reached unhandled opcode: {}", other);
                        }
                    }
                }
            }
        }

        Ok(SuccessfulOutput {
            reverted,
            gas_left: state.gas_left,
            output_data: state.output_data.clone(),
        })
    }

    /// JUMP: pop the target and transfer to its block entry.
    fn jump(&self, state: &mut ExecutionState, imm: u64) -> Result<usize, StatusCode> {
        let target = state.stack.pop();
        self.jump_to(state, imm_hi(imm), target)
    }

    fn jump_to(
        &self,
        _state: &mut ExecutionState,
        resolved: u32,
        target: U256,
    ) -> Result<usize, StatusCode> {
        if resolved != SENTINEL {
            return Ok(resolved as usize);
        }

        if !self.jumpdests.contains(target) {
            return Err(StatusCode::BadJumpDestination);
        }

        let index = self.pc_to_block_start[target.as_usize()];
        if index == SENTINEL {
            return Err(StatusCode::BadJumpDestination);
        }

        Ok(index as usize)
    }

    /// An initcode frame's RETURN produces the deployed code; enforce the
    /// deployed size limit (EIP-170) and the 0xEF prefix ban (EIP-3541).
    fn validate_created_code(&self, state: &ExecutionState) -> Result<(), StatusCode> {
        if !matches!(
            state.message.kind,
            CallKind::Create | CallKind::Create2 { .. }
        ) {
            return Ok(());
        }

        if self.revision() >= Revision::London && state.output_data.first() == Some(&0xef) {
            return Err(StatusCode::InvalidContractPrefix);
        }

        if self.revision() >= Revision::Byzantium && state.output_data.len() > MAX_CODE_SIZE {
            return Err(StatusCode::MaxCodeSizeExceeded);
        }

        Ok(())
    }

    fn trace<T: Tracer>(&self, tracer: &mut T, i: usize, op: OpCode, state: &ExecutionState) {
        // The sentinel STOP is not part of the program.
        if !T::DUMMY && i != self.headers.len() - 1 {
            tracer.notify_instruction_start(self.inst_to_pc[i] as usize, op, state);
        }
    }
}
