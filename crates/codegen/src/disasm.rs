//! Disassembler for the machine code this backend emits

use crate::error::{CodegenError, Result};
use evm_glue::opcodes::Opcode;
use std::fmt::Write;

macro_rules! decode_push {
    ($n:expr, $imm:expr; $($size:literal => $op:ident),+ $(,)?) => {
        match $n {
            $($size => <[u8; $size]>::try_from($imm).ok().map(Opcode::$op),)+
            _ => None,
        }
    };
}

macro_rules! push_immediate {
    ($opcode:expr; $($op:ident),+ $(,)?) => {
        match $opcode {
            $(Opcode::$op(imm) => Some(&imm[..]),)+
            _ => None,
        }
    };
}

const PUSH1: u8 = 0x60;
const PUSH32: u8 = 0x7f;

fn simple_opcode(byte: u8) -> Option<Opcode> {
    Some(match byte {
        0x00 => Opcode::STOP,
        0x01 => Opcode::ADD,
        0x02 => Opcode::MUL,
        0x03 => Opcode::SUB,
        0x04 => Opcode::DIV,
        0x14 => Opcode::EQ,
        0x1c => Opcode::SHR,
        0x35 => Opcode::CALLDATALOAD,
        0x39 => Opcode::CODECOPY,
        0x51 => Opcode::MLOAD,
        0x52 => Opcode::MSTORE,
        0x57 => Opcode::JUMPI,
        0x5b => Opcode::JUMPDEST,
        0x90 => Opcode::SWAP1,
        0xf3 => Opcode::RETURN,
        _ => return None,
    })
}

fn push_with_immediate(size: usize, imm: &[u8]) -> Option<Opcode> {
    decode_push!(size, imm;
        1 => PUSH1, 2 => PUSH2, 3 => PUSH3, 4 => PUSH4, 5 => PUSH5, 6 => PUSH6, 7 => PUSH7,
        8 => PUSH8, 9 => PUSH9, 10 => PUSH10, 11 => PUSH11, 12 => PUSH12, 13 => PUSH13,
        14 => PUSH14, 15 => PUSH15, 16 => PUSH16, 17 => PUSH17, 18 => PUSH18, 19 => PUSH19,
        20 => PUSH20, 21 => PUSH21, 22 => PUSH22, 23 => PUSH23, 24 => PUSH24, 25 => PUSH25,
        26 => PUSH26, 27 => PUSH27, 28 => PUSH28, 29 => PUSH29, 30 => PUSH30, 31 => PUSH31,
        32 => PUSH32,
    )
}

/// Immediate bytes of a push, `None` for every other opcode
pub fn immediate(opcode: &Opcode) -> Option<&[u8]> {
    push_immediate!(opcode;
        PUSH1, PUSH2, PUSH3, PUSH4, PUSH5, PUSH6, PUSH7, PUSH8, PUSH9, PUSH10, PUSH11, PUSH12,
        PUSH13, PUSH14, PUSH15, PUSH16, PUSH17, PUSH18, PUSH19, PUSH20, PUSH21, PUSH22, PUSH23,
        PUSH24, PUSH25, PUSH26, PUSH27, PUSH28, PUSH29, PUSH30, PUSH31, PUSH32,
    )
}

/// Decode `code` into opcodes paired with their byte offsets.
pub fn decode_with_offsets(code: &[u8]) -> Result<Vec<(usize, Opcode)>> {
    let mut out = Vec::new();
    let mut pc = 0;
    while let Some(&byte) = code.get(pc) {
        if (PUSH1..=PUSH32).contains(&byte) {
            let size = usize::from(byte - PUSH1) + 1;
            let available = code.len() - pc - 1;
            if available < size {
                return Err(CodegenError::TruncatedPush { offset: pc, missing: size - available });
            }
            let opcode = push_with_immediate(size, &code[pc + 1..pc + 1 + size])
                .ok_or(CodegenError::UnknownMachineOpcode { offset: pc, byte })?;
            out.push((pc, opcode));
            pc += 1 + size;
        } else {
            let opcode = simple_opcode(byte)
                .ok_or(CodegenError::UnknownMachineOpcode { offset: pc, byte })?;
            out.push((pc, opcode));
            pc += 1;
        }
    }
    Ok(out)
}

pub fn decode(code: &[u8]) -> Result<Vec<Opcode>> {
    Ok(decode_with_offsets(code)?.into_iter().map(|(_, op)| op).collect())
}

/// One `offset  MNEMONIC [0ximmediate]` line per instruction
pub fn listing(code: &[u8]) -> Result<String> {
    let mut out = String::new();
    for (pc, opcode) in decode_with_offsets(code)? {
        match immediate(&opcode) {
            Some(imm) => {
                let size = imm.len();
                let _ = write!(out, "{pc:04x}  PUSH{size} 0x");
                for b in imm {
                    let _ = write!(out, "{b:02x}");
                }
                out.push('\n');
            }
            None => {
                let _ = writeln!(out, "{pc:04x}  {opcode:?}");
            }
        }
    }
    Ok(out)
}
