use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use sha3::{Digest, Keccak256};
use strum_macros::Display;

/// EVM revision.
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Revision {
    /// The Frontier revision.
    /// The one Ethereum launched with.
    Frontier = 0,

    /// [The Homestead revision.](https://eips.ethereum.org/EIPS/eip-606)
    Homestead = 1,

    /// [The Byzantium revision.](https://eips.ethereum.org/EIPS/eip-609)
    Byzantium = 2,

    /// [The Constantinople revision.](https://eips.ethereum.org/EIPS/eip-1013)
    Constantinople = 3,

    /// [The Istanbul revision.](https://eips.ethereum.org/EIPS/eip-1679)
    Istanbul = 4,

    /// [The Berlin revision.](https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/berlin.md)
    Berlin = 5,

    /// [The London revision.](https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/london.md)
    London = 6,

    /// [The Merge revision.](https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/paris.md)
    Merge = 7,

    /// [The Shanghai revision.](https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/shanghai.md)
    Shanghai = 8,

    /// [The Cancun revision.](https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/cancun.md)
    Cancun = 9,
}

impl Revision {
    pub fn iter() -> impl Iterator<Item = Self> {
        (&[
            Self::Frontier,
            Self::Homestead,
            Self::Byzantium,
            Self::Constantinople,
            Self::Istanbul,
            Self::Berlin,
            Self::London,
            Self::Merge,
            Self::Shanghai,
            Self::Cancun,
        ])
            .iter()
            .copied()
    }

    pub const fn len() -> usize {
        Self::Cancun as usize + 1
    }

    pub const fn latest() -> Self {
        Self::Cancun
    }
}

/// Message status code.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum StatusCode {
    /// Execution finished with success.
    #[strum(serialize = "success")]
    Success,

    /// Execution terminated with the REVERT opcode.
    ///
    /// Unused gas and output data are preserved.
    #[strum(serialize = "revert")]
    Revert,

    /// The execution has run out of gas.
    #[strum(serialize = "out of gas")]
    OutOfGas,

    /// The designated INVALID instruction has been hit during execution.
    ///
    /// [EIP-141](https://eips.ethereum.org/EIPS/eip-141) defines the
    /// instruction 0xfe as INVALID to indicate execution abortion coming
    /// from high-level languages.
    #[strum(serialize = "invalid instruction")]
    InvalidInstruction,

    /// An instruction absent from the active revision has been encountered.
    #[strum(serialize = "undefined instruction")]
    UndefinedInstruction,

    /// The execution has attempted to put more items on the EVM stack
    /// than the specified limit.
    #[strum(serialize = "stack overflow")]
    StackOverflow,

    /// Execution of an opcode has required more items on the EVM stack.
    #[strum(serialize = "stack underflow")]
    StackUnderflow,

    /// Execution has violated the jump destination restrictions.
    #[strum(serialize = "bad jump destination")]
    BadJumpDestination,

    /// Tried to read outside memory bounds.
    ///
    /// An example is RETURNDATACOPY reading past the available buffer.
    #[strum(serialize = "invalid memory access")]
    InvalidMemoryAccess,

    /// Call depth has exceeded the limit.
    #[strum(serialize = "call depth exceeded")]
    CallDepthExceeded,

    /// Tried to execute an operation which is restricted in static mode.
    #[strum(serialize = "static mode violation")]
    StaticModeViolation,

    /// Contract creation returned code larger than the deployed code limit
    /// ([EIP-170](https://eips.ethereum.org/EIPS/eip-170)), or creation code
    /// exceeded the initcode limit
    /// ([EIP-3860](https://eips.ethereum.org/EIPS/eip-3860)).
    #[strum(serialize = "max code size exceeded")]
    MaxCodeSizeExceeded,

    /// Contract creation returned code starting with the 0xEF byte
    /// ([EIP-3541](https://eips.ethereum.org/EIPS/eip-3541)).
    #[strum(serialize = "invalid contract prefix")]
    InvalidContractPrefix,

    /// Memory expansion past the implementation's hard cap.
    #[strum(serialize = "memory limit exceeded")]
    MemoryLimitExceeded,

    /// EVM implementation generic internal error, including errors
    /// propagated from the host.
    #[strum(serialize = "internal error")]
    InternalError(String),
}

impl From<anyhow::Error> for StatusCode {
    fn from(e: anyhow::Error) -> Self {
        StatusCode::InternalError(e.to_string())
    }
}

/// The kind of call-like instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Call,
    DelegateCall,
    CallCode,
    Create,
    Create2 { salt: H256 },
}

/// The message describing an EVM call,
/// including a zero-depth calls from a transaction origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// The kind of the call. For zero-depth calls `CallKind::Call` SHOULD be used.
    pub kind: CallKind,

    /// Static call mode.
    pub is_static: bool,

    /// The call depth.
    pub depth: i32,

    /// The amount of gas for message execution.
    pub gas: i64,

    /// The destination of the message.
    pub destination: Address,

    /// The sender of the message.
    pub sender: Address,

    /// Message input data.
    pub input_data: Bytes,

    /// The amount of Ether transferred with the message.
    pub value: U256,
}

/// Output of EVM execution.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    /// EVM exited with this status code.
    pub status_code: StatusCode,
    /// How much gas was left after execution
    pub gas_left: i64,
    /// Output data returned.
    pub output_data: Bytes,
    /// Contract creation address.
    pub create_address: Option<Address>,
}

/// Output of a successfully terminated frame, before it is folded into
/// [`Output`].
#[derive(Clone, Debug, PartialEq)]
pub struct SuccessfulOutput {
    pub reverted: bool,
    pub gas_left: i64,
    pub output_data: Bytes,
}

impl From<SuccessfulOutput> for Output {
    fn from(output: SuccessfulOutput) -> Self {
        Self {
            status_code: if output.reverted {
                StatusCode::Revert
            } else {
                StatusCode::Success
            },
            gas_left: output.gas_left,
            output_data: output.output_data,
            create_address: None,
        }
    }
}

#[inline]
pub(crate) fn u256_to_address(v: U256) -> Address {
    H256(v.into()).into()
}

#[inline]
pub(crate) fn address_to_u256(v: Address) -> U256 {
    U256::from_big_endian(&v.0)
}

/// Address of a contract created with CREATE: `keccak(rlp([sender, nonce]))[12..]`.
pub fn create_address(sender: Address, nonce: u64) -> Address {
    let mut nonce_bytes = nonce.to_be_bytes().to_vec();
    while nonce_bytes.first() == Some(&0) {
        nonce_bytes.remove(0);
    }

    // RLP of the two-item list; payload is always < 56 bytes.
    let mut payload = Vec::with_capacity(30);
    payload.push(0x80 + 20);
    payload.extend_from_slice(&sender.0);
    match nonce_bytes.as_slice() {
        [] => payload.push(0x80),
        [b] if *b < 0x80 => payload.push(*b),
        bytes => {
            payload.push(0x80 + bytes.len() as u8);
            payload.extend_from_slice(bytes);
        }
    }

    let mut rlp = Vec::with_capacity(payload.len() + 1);
    rlp.push(0xc0 + payload.len() as u8);
    rlp.extend_from_slice(&payload);

    Address::from_slice(&Keccak256::digest(&rlp)[12..])
}

/// Address of a contract created with CREATE2:
/// `keccak(0xff ++ sender ++ salt ++ keccak(initcode))[12..]`.
pub fn create2_address(sender: Address, salt: H256, initcode: &[u8]) -> Address {
    let mut buf = [0_u8; 1 + 20 + 32 + 32];
    buf[0] = 0xff;
    buf[1..21].copy_from_slice(&sender.0);
    buf[21..53].copy_from_slice(&salt.0);
    buf[53..].copy_from_slice(&Keccak256::digest(initcode));

    Address::from_slice(&Keccak256::digest(&buf)[12..])
}
