//! Error types for code generation

use aurora_ir_data::{Label, Opcode};
use thiserror::Error;

/// Error type for code generation
#[derive(Debug, Error)]
pub enum CodegenError {
    /// An operand names a label that no earlier instruction defines
    #[error("instruction {label} references undefined label {operand}")]
    DanglingReference { label: Label, operand: Label },

    /// `BeginScope` whose count does not line up with a closing `Return`
    #[error("malformed scope {label}: {reason}")]
    MalformedScope { label: Label, reason: &'static str },

    #[error("instruction {label}: `{opcode}` is not supported by the EVM backend")]
    Unsupported { label: Label, opcode: Opcode },

    /// A literal or numeric field with an unusable width
    #[error("instruction {label}: {reason}")]
    InvalidOperand { label: Label, reason: &'static str },

    #[error("identifier `{name}` is loaded before it is bound")]
    UnboundIdentifier { name: Label },

    #[error("binding `{name}` exceeds the limit of {limit} identifiers")]
    TooManyIdentifiers { name: Label, limit: usize },

    #[error("instruction {label}: argument index {index} is outside the calldata window")]
    ArgumentIndexOutOfRange { label: Label, index: u64 },

    #[error("dispatcher jump target {target} for segment `{segment}` does not fit in one byte")]
    JumpTargetOutOfRange { segment: Label, target: usize },

    #[error("runtime code is {size} bytes, instantiate code supports at most 255")]
    RuntimeTooLarge { size: usize },

    #[error("unknown machine opcode 0x{byte:02x} at offset {offset}")]
    UnknownMachineOpcode { offset: usize, byte: u8 },

    #[error("push at offset {offset} is missing {missing} immediate byte(s)")]
    TruncatedPush { offset: usize, missing: usize },

    #[error("assembly failed: {0}")]
    Assembly(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for code generation operations
pub type Result<T> = std::result::Result<T, CodegenError>;
