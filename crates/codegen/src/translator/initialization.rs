//! Deployment code that installs the runtime code

use super::helpers::{assemble, op, push_byte};
use crate::error::{CodegenError, Result};
use evm_glue::opcodes::Opcode;

/// Length of the instantiate code; the runtime code starts right after it in the payload
pub const INSTANTIATE_CODE_SIZE: u8 = 12;

/// `CODECOPY` the runtime code that follows into memory and `RETURN` it.
pub fn instantiate_code(runtime_size: usize) -> Result<Vec<u8>> {
    let size =
        u8::try_from(runtime_size).map_err(|_| CodegenError::RuntimeTooLarge { size: runtime_size })?;

    let mut asm = Vec::with_capacity(7);
    // Stack after pushes: [size, code offset, memory offset]
    push_byte(&mut asm, size);
    push_byte(&mut asm, INSTANTIATE_CODE_SIZE);
    push_byte(&mut asm, 0);
    op(&mut asm, Opcode::CODECOPY);
    push_byte(&mut asm, size);
    push_byte(&mut asm, 0);
    op(&mut asm, Opcode::RETURN);
    assemble(&asm)
}
