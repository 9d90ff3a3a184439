//! Helper methods for assembly generation

use crate::error::{CodegenError, Result};
use evm_glue::{assembler::assemble_minimized, assembly::Asm, opcodes::Opcode};

macro_rules! push_sized {
    ($bytes:expr; $($n:literal => $op:ident),+ $(,)?) => {
        match $bytes.len() {
            $($n => Some(Opcode::$op(<[u8; $n]>::try_from($bytes).ok()?)),)+
            _ => None,
        }
    };
}

/// `PUSHn` carrying exactly `bytes`, or `None` when the width is not 1 to 32 bytes
pub(super) fn push_opcode(bytes: &[u8]) -> Option<Opcode> {
    push_sized!(bytes;
        1 => PUSH1, 2 => PUSH2, 3 => PUSH3, 4 => PUSH4, 5 => PUSH5, 6 => PUSH6, 7 => PUSH7,
        8 => PUSH8, 9 => PUSH9, 10 => PUSH10, 11 => PUSH11, 12 => PUSH12, 13 => PUSH13,
        14 => PUSH14, 15 => PUSH15, 16 => PUSH16, 17 => PUSH17, 18 => PUSH18, 19 => PUSH19,
        20 => PUSH20, 21 => PUSH21, 22 => PUSH22, 23 => PUSH23, 24 => PUSH24, 25 => PUSH25,
        26 => PUSH26, 27 => PUSH27, 28 => PUSH28, 29 => PUSH29, 30 => PUSH30, 31 => PUSH31,
        32 => PUSH32,
    )
}

/// Push a single byte. Zero is pushed as `PUSH1 0x00`, never `PUSH0`, so layouts stay fixed.
pub(super) fn push_byte(asm: &mut Vec<Asm>, value: u8) {
    asm.push(Asm::Op(Opcode::PUSH1([value])));
}

pub(super) fn op(asm: &mut Vec<Asm>, opcode: Opcode) {
    asm.push(Asm::Op(opcode));
}

/// Assemble mark-free assembly into bytes
pub(super) fn assemble(asm: &[Asm]) -> Result<Vec<u8>> {
    let (_, bytecode) =
        assemble_minimized(asm, true).map_err(|e| CodegenError::Assembly(format!("{e:?}")))?;
    Ok(bytecode)
}
