//! Instruction Stream data model for the Aurora toolchain.
//!
//! The IR emitter lowers an AST into a flat list of labeled [`Instruction`]s. Each instruction's
//! `label` names its result; later instructions refer to that result by putting the label bytes
//! in their `left` or `right` field. Those references are def-use edges between instructions, not
//! runtime values.

pub mod builder;
pub mod codec;
pub mod opcode;

pub use builder::StreamBuilder;
pub use codec::{CodecError, decode, encode};
pub use opcode::Opcode;

use std::{borrow::Borrow, fmt};

/// Width of the numeric fields (`GetArg` index, `BeginScope` count, 64-bit literals).
pub const NUMERIC_FIELD_SIZE: usize = 8;

/// Name of an instruction's result.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Label(Vec<u8>);

impl Label {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Borrow<[u8]> for Label {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Label {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({self})")
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes(f, &self.0)
    }
}

/// Writes printable ASCII as-is and anything else as `0x`-prefixed hex.
pub fn fmt_bytes(f: &mut impl fmt::Write, bytes: &[u8]) -> fmt::Result {
    if !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_graphic()) {
        for &b in bytes {
            f.write_char(b as char)?;
        }
        return Ok(());
    }
    write!(f, "0x")?;
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

/// Decodes a big-endian numeric field. Values shorter than 8 bytes are left-padded with zeros;
/// wider values do not fit and yield `None`.
pub fn be_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > NUMERIC_FIELD_SIZE {
        return None;
    }
    let mut buf = [0u8; NUMERIC_FIELD_SIZE];
    buf[NUMERIC_FIELD_SIZE - bytes.len()..].copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

/// One entry of the instruction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub label: Label,
    pub opcode: Opcode,
    pub left: Vec<u8>,
    pub right: Vec<u8>,
}

impl Instruction {
    pub fn new(
        label: impl Into<Label>,
        opcode: Opcode,
        left: impl Into<Vec<u8>>,
        right: impl Into<Vec<u8>>,
    ) -> Self {
        Self { label: label.into(), opcode, left: left.into(), right: right.into() }
    }

    pub fn left_u64(&self) -> Option<u64> {
        be_u64(&self.left)
    }

    pub fn right_u64(&self) -> Option<u64> {
        be_u64(&self.right)
    }

    /// The fields holding label references for this opcode, as `(left, right)`.
    pub fn references(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        match self.opcode {
            op if op.is_binary() => (Some(self.left.as_slice()), Some(self.right.as_slice())),
            Opcode::Ident | Opcode::Return => (None, Some(self.right.as_slice())),
            _ => (None, None),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{} = {}", self.label, self.opcode)?;
        match self.opcode {
            op if op.is_binary() => {
                write!(f, " %")?;
                fmt_bytes(f, &self.left)?;
                write!(f, " %")?;
                fmt_bytes(f, &self.right)
            }
            Opcode::Save => {
                write!(f, " 0x")?;
                for b in &self.left {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Opcode::GetArg => match self.left_u64() {
                Some(index) => write!(f, " {index}"),
                None => write!(f, " ?"),
            },
            Opcode::BeginScope => match self.right_u64() {
                Some(count) => write!(f, " {count}"),
                None => write!(f, " ?"),
            },
            Opcode::Ident => {
                write!(f, " ")?;
                fmt_bytes(f, &self.left)?;
                write!(f, " %")?;
                fmt_bytes(f, &self.right)
            }
            Opcode::Load => {
                write!(f, " ")?;
                fmt_bytes(f, &self.left)
            }
            Opcode::Return => {
                write!(f, " %")?;
                fmt_bytes(f, &self.left)?;
                write!(f, " %")?;
                fmt_bytes(f, &self.right)
            }
            _ => {
                if !self.left.is_empty() {
                    write!(f, " ")?;
                    fmt_bytes(f, &self.left)?;
                }
                if !self.right.is_empty() {
                    write!(f, " ")?;
                    fmt_bytes(f, &self.right)?;
                }
                Ok(())
            }
        }
    }
}
