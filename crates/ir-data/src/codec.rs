//! Binary encoding of instruction streams.
//!
//! Each instruction is written as
//! `[u32 label_len][label][u8 opcode][u32 left_len][left][u32 right_len][right]`
//! with all lengths big-endian. A stream is the plain concatenation of its instructions.

use crate::{Instruction, Label, Opcode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("truncated stream at byte {offset}: needed {needed} more byte(s)")]
    Truncated { offset: usize, needed: usize },
    #[error("unknown opcode tag 0x{tag:02x} at byte {offset}")]
    UnknownOpcode { offset: usize, tag: u8 },
}

pub fn encode(instructions: &[Instruction]) -> Vec<u8> {
    let mut out = Vec::new();
    for inst in instructions {
        encode_into(inst, &mut out);
    }
    out
}

pub fn encode_into(inst: &Instruction, out: &mut Vec<u8>) {
    write_field(out, inst.label.as_bytes());
    out.push(inst.opcode.tag());
    write_field(out, &inst.left);
    write_field(out, &inst.right);
}

fn write_field(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>, CodecError> {
    let mut reader = Reader { bytes, offset: 0 };
    let mut instructions = Vec::new();
    while !reader.is_done() {
        let label = Label::new(reader.field()?);
        let tag_offset = reader.offset;
        let tag = reader.take(1)?[0];
        let opcode =
            Opcode::from_tag(tag).ok_or(CodecError::UnknownOpcode { offset: tag_offset, tag })?;
        let left = reader.field()?;
        let right = reader.field()?;
        instructions.push(Instruction { label, opcode, left, right });
    }
    Ok(instructions)
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn is_done(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.bytes.len() - self.offset;
        if remaining < n {
            return Err(CodecError::Truncated { offset: self.offset, needed: n - remaining });
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn field(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.take(4)?;
        let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
        Ok(self.take(len)?.to_vec())
    }
}
