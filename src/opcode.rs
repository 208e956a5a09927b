use core::fmt;

/// EVM opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpCode(pub u8);

impl OpCode {
    pub const STOP: OpCode = OpCode(0x00);
    pub const ADD: OpCode = OpCode(0x01);
    pub const MUL: OpCode = OpCode(0x02);
    pub const SUB: OpCode = OpCode(0x03);
    pub const DIV: OpCode = OpCode(0x04);
    pub const SDIV: OpCode = OpCode(0x05);
    pub const MOD: OpCode = OpCode(0x06);
    pub const SMOD: OpCode = OpCode(0x07);
    pub const ADDMOD: OpCode = OpCode(0x08);
    pub const MULMOD: OpCode = OpCode(0x09);
    pub const EXP: OpCode = OpCode(0x0a);
    pub const SIGNEXTEND: OpCode = OpCode(0x0b);

    pub const LT: OpCode = OpCode(0x10);
    pub const GT: OpCode = OpCode(0x11);
    pub const SLT: OpCode = OpCode(0x12);
    pub const SGT: OpCode = OpCode(0x13);
    pub const EQ: OpCode = OpCode(0x14);
    pub const ISZERO: OpCode = OpCode(0x15);
    pub const AND: OpCode = OpCode(0x16);
    pub const OR: OpCode = OpCode(0x17);
    pub const XOR: OpCode = OpCode(0x18);
    pub const NOT: OpCode = OpCode(0x19);
    pub const BYTE: OpCode = OpCode(0x1a);
    pub const SHL: OpCode = OpCode(0x1b);
    pub const SHR: OpCode = OpCode(0x1c);
    pub const SAR: OpCode = OpCode(0x1d);

    pub const KECCAK256: OpCode = OpCode(0x20);

    pub const ADDRESS: OpCode = OpCode(0x30);
    pub const BALANCE: OpCode = OpCode(0x31);
    pub const ORIGIN: OpCode = OpCode(0x32);
    pub const CALLER: OpCode = OpCode(0x33);
    pub const CALLVALUE: OpCode = OpCode(0x34);
    pub const CALLDATALOAD: OpCode = OpCode(0x35);
    pub const CALLDATASIZE: OpCode = OpCode(0x36);
    pub const CALLDATACOPY: OpCode = OpCode(0x37);
    pub const CODESIZE: OpCode = OpCode(0x38);
    pub const CODECOPY: OpCode = OpCode(0x39);
    pub const GASPRICE: OpCode = OpCode(0x3a);
    pub const EXTCODESIZE: OpCode = OpCode(0x3b);
    pub const EXTCODECOPY: OpCode = OpCode(0x3c);
    pub const RETURNDATASIZE: OpCode = OpCode(0x3d);
    pub const RETURNDATACOPY: OpCode = OpCode(0x3e);
    pub const EXTCODEHASH: OpCode = OpCode(0x3f);

    pub const BLOCKHASH: OpCode = OpCode(0x40);
    pub const COINBASE: OpCode = OpCode(0x41);
    pub const TIMESTAMP: OpCode = OpCode(0x42);
    pub const NUMBER: OpCode = OpCode(0x43);
    /// PREVRANDAO from the Merge revision on.
    pub const DIFFICULTY: OpCode = OpCode(0x44);
    pub const GASLIMIT: OpCode = OpCode(0x45);
    pub const CHAINID: OpCode = OpCode(0x46);
    pub const SELFBALANCE: OpCode = OpCode(0x47);
    pub const BASEFEE: OpCode = OpCode(0x48);
    pub const BLOBHASH: OpCode = OpCode(0x49);
    pub const BLOBBASEFEE: OpCode = OpCode(0x4a);

    pub const POP: OpCode = OpCode(0x50);
    pub const MLOAD: OpCode = OpCode(0x51);
    pub const MSTORE: OpCode = OpCode(0x52);
    pub const MSTORE8: OpCode = OpCode(0x53);
    pub const SLOAD: OpCode = OpCode(0x54);
    pub const SSTORE: OpCode = OpCode(0x55);
    pub const JUMP: OpCode = OpCode(0x56);
    pub const JUMPI: OpCode = OpCode(0x57);
    pub const PC: OpCode = OpCode(0x58);
    pub const MSIZE: OpCode = OpCode(0x59);
    pub const GAS: OpCode = OpCode(0x5a);
    pub const JUMPDEST: OpCode = OpCode(0x5b);
    pub const TLOAD: OpCode = OpCode(0x5c);
    pub const TSTORE: OpCode = OpCode(0x5d);
    pub const MCOPY: OpCode = OpCode(0x5e);
    pub const PUSH0: OpCode = OpCode(0x5f);

    pub const PUSH1: OpCode = OpCode(0x60);
    pub const PUSH2: OpCode = OpCode(0x61);
    pub const PUSH3: OpCode = OpCode(0x62);
    pub const PUSH4: OpCode = OpCode(0x63);
    pub const PUSH5: OpCode = OpCode(0x64);
    pub const PUSH6: OpCode = OpCode(0x65);
    pub const PUSH7: OpCode = OpCode(0x66);
    pub const PUSH8: OpCode = OpCode(0x67);
    pub const PUSH9: OpCode = OpCode(0x68);
    pub const PUSH10: OpCode = OpCode(0x69);
    pub const PUSH11: OpCode = OpCode(0x6a);
    pub const PUSH12: OpCode = OpCode(0x6b);
    pub const PUSH13: OpCode = OpCode(0x6c);
    pub const PUSH14: OpCode = OpCode(0x6d);
    pub const PUSH15: OpCode = OpCode(0x6e);
    pub const PUSH16: OpCode = OpCode(0x6f);
    pub const PUSH17: OpCode = OpCode(0x70);
    pub const PUSH18: OpCode = OpCode(0x71);
    pub const PUSH19: OpCode = OpCode(0x72);
    pub const PUSH20: OpCode = OpCode(0x73);
    pub const PUSH21: OpCode = OpCode(0x74);
    pub const PUSH22: OpCode = OpCode(0x75);
    pub const PUSH23: OpCode = OpCode(0x76);
    pub const PUSH24: OpCode = OpCode(0x77);
    pub const PUSH25: OpCode = OpCode(0x78);
    pub const PUSH26: OpCode = OpCode(0x79);
    pub const PUSH27: OpCode = OpCode(0x7a);
    pub const PUSH28: OpCode = OpCode(0x7b);
    pub const PUSH29: OpCode = OpCode(0x7c);
    pub const PUSH30: OpCode = OpCode(0x7d);
    pub const PUSH31: OpCode = OpCode(0x7e);
    pub const PUSH32: OpCode = OpCode(0x7f);

    pub const DUP1: OpCode = OpCode(0x80);
    pub const DUP2: OpCode = OpCode(0x81);
    pub const DUP3: OpCode = OpCode(0x82);
    pub const DUP4: OpCode = OpCode(0x83);
    pub const DUP5: OpCode = OpCode(0x84);
    pub const DUP6: OpCode = OpCode(0x85);
    pub const DUP7: OpCode = OpCode(0x86);
    pub const DUP8: OpCode = OpCode(0x87);
    pub const DUP9: OpCode = OpCode(0x88);
    pub const DUP10: OpCode = OpCode(0x89);
    pub const DUP11: OpCode = OpCode(0x8a);
    pub const DUP12: OpCode = OpCode(0x8b);
    pub const DUP13: OpCode = OpCode(0x8c);
    pub const DUP14: OpCode = OpCode(0x8d);
    pub const DUP15: OpCode = OpCode(0x8e);
    pub const DUP16: OpCode = OpCode(0x8f);

    pub const SWAP1: OpCode = OpCode(0x90);
    pub const SWAP2: OpCode = OpCode(0x91);
    pub const SWAP3: OpCode = OpCode(0x92);
    pub const SWAP4: OpCode = OpCode(0x93);
    pub const SWAP5: OpCode = OpCode(0x94);
    pub const SWAP6: OpCode = OpCode(0x95);
    pub const SWAP7: OpCode = OpCode(0x96);
    pub const SWAP8: OpCode = OpCode(0x97);
    pub const SWAP9: OpCode = OpCode(0x98);
    pub const SWAP10: OpCode = OpCode(0x99);
    pub const SWAP11: OpCode = OpCode(0x9a);
    pub const SWAP12: OpCode = OpCode(0x9b);
    pub const SWAP13: OpCode = OpCode(0x9c);
    pub const SWAP14: OpCode = OpCode(0x9d);
    pub const SWAP15: OpCode = OpCode(0x9e);
    pub const SWAP16: OpCode = OpCode(0x9f);

    pub const LOG0: OpCode = OpCode(0xa0);
    pub const LOG1: OpCode = OpCode(0xa1);
    pub const LOG2: OpCode = OpCode(0xa2);
    pub const LOG3: OpCode = OpCode(0xa3);
    pub const LOG4: OpCode = OpCode(0xa4);

    pub const CREATE: OpCode = OpCode(0xf0);
    pub const CALL: OpCode = OpCode(0xf1);
    pub const CALLCODE: OpCode = OpCode(0xf2);
    pub const RETURN: OpCode = OpCode(0xf3);
    pub const DELEGATECALL: OpCode = OpCode(0xf4);
    pub const CREATE2: OpCode = OpCode(0xf5);
    pub const STATICCALL: OpCode = OpCode(0xfa);
    pub const REVERT: OpCode = OpCode(0xfd);
    pub const INVALID: OpCode = OpCode(0xfe);
    pub const SELFDESTRUCT: OpCode = OpCode(0xff);
}

/// Intrinsic instructions emitted by the analyzer into the unassigned
/// 0xB0..0xBF opcode space. They never appear in bytecode.
impl OpCode {
    /// Synthetic block entry validating the whole block's gas and stack
    /// requirements up front.
    pub const BEGINBLOCK: OpCode = OpCode(0xb0);
    /// Fused `PUSH k; ADD`.
    pub const PUSHADD: OpCode = OpCode(0xb1);
    /// Fused `PUSH k; SUB`.
    pub const PUSHSUB: OpCode = OpCode(0xb2);
    /// Fused `PUSH k; MUL`.
    pub const PUSHMUL: OpCode = OpCode(0xb3);
    /// Fused `PUSH k; DIV`.
    pub const PUSHDIV: OpCode = OpCode(0xb4);
    /// Fused `PUSH k; JUMP` with the target resolved during analysis.
    pub const PUSHJUMP: OpCode = OpCode(0xb5);
    /// Fused `PUSH k; JUMPI` with the target resolved during analysis.
    pub const PUSHJUMPI: OpCode = OpCode(0xb6);
    /// Fused `ISZERO; ISZERO`.
    pub const ISZERO2: OpCode = OpCode(0xb7);
    /// Fused `DUP1; SWAP1`.
    pub const DUPSWAP: OpCode = OpCode(0xb8);
    /// Placeholder for an opcode absent from the active revision.
    pub const UNDEFINED: OpCode = OpCode(0xb9);
}

impl OpCode {
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// Number of immediate data bytes following the opcode in the bytecode.
    /// Non-zero only for PUSH1..=PUSH32.
    #[inline]
    pub const fn immediate_size(self) -> usize {
        match self.0 {
            0x60..=0x7f => (self.0 - 0x5f) as usize,
            _ => 0,
        }
    }

    /// True for PUSH0..=PUSH32.
    #[inline]
    pub const fn is_push(self) -> bool {
        matches!(self.0, 0x5f..=0x7f)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BEGINBLOCK => "BEGINBLOCK",
            Self::PUSHADD => "PUSHADD",
            Self::PUSHSUB => "PUSHSUB",
            Self::PUSHMUL => "PUSHMUL",
            Self::PUSHDIV => "PUSHDIV",
            Self::PUSHJUMP => "PUSHJUMP",
            Self::PUSHJUMPI => "PUSHJUMPI",
            Self::ISZERO2 => "ISZERO2",
            Self::DUPSWAP => "DUPSWAP",
            Self::UNDEFINED => "UNDEFINED",
            other => crate::instructions::PROPERTIES[other.to_usize()]
                .map(|p| p.name)
                .unwrap_or("UNKNOWN"),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
