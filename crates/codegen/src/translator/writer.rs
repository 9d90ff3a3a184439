//! Per-body code writer

use super::{
    Translator,
    constants::{ASM_INSTRUCTIONS_PER_OPERATION, EVM_WORD_SIZE},
    helpers::{assemble, op, push_byte, push_opcode},
};
use crate::{
    calldata_args_offset,
    error::{CodegenError, Result},
};
use aurora_ir_data::{Instruction, Opcode as IrOpcode};
use evm_glue::{assembly::Asm, opcodes::Opcode};
use tracing::trace;

impl Translator {
    /// Translate one body (segment or root) to bytes. Every body ends with `STOP`.
    pub(super) fn write_body(&mut self, body: &[Instruction]) -> Result<Vec<u8>> {
        let mut asm = Vec::with_capacity(body.len() * ASM_INSTRUCTIONS_PER_OPERATION + 1);
        for inst in body {
            trace!(%inst, "writing");
            self.write_instruction(&mut asm, inst)?;
        }
        op(&mut asm, Opcode::STOP);
        assemble(&asm)
    }

    fn write_instruction(&mut self, asm: &mut Vec<Asm>, inst: &Instruction) -> Result<()> {
        match inst.opcode {
            IrOpcode::Add => op(asm, Opcode::ADD),
            IrOpcode::Multiply => op(asm, Opcode::MUL),
            IrOpcode::Subtract => op(asm, Opcode::SUB),
            IrOpcode::Divide => op(asm, Opcode::DIV),

            IrOpcode::Save => {
                let push = push_opcode(&inst.left).ok_or(CodegenError::InvalidOperand {
                    label: inst.label.clone(),
                    reason: "literal must be 1 to 32 bytes wide",
                })?;
                op(asm, push);
            }
            IrOpcode::GetArg => {
                let index = inst.left_u64().ok_or(CodegenError::InvalidOperand {
                    label: inst.label.clone(),
                    reason: "argument index wider than 64 bits",
                })?;
                let offset = calldata_args_offset(index).ok_or(
                    CodegenError::ArgumentIndexOutOfRange { label: inst.label.clone(), index },
                )?;
                push_byte(asm, offset);
                op(asm, Opcode::CALLDATALOAD);
            }
            IrOpcode::Ident => {
                let offset = self.state.idents.declare(&inst.left)?;
                push_byte(asm, offset);
                op(asm, Opcode::MSTORE);
            }
            IrOpcode::Load => {
                let offset = self.state.idents.offset_of(&inst.left)?;
                push_byte(asm, offset);
                op(asm, Opcode::MLOAD);
            }
            IrOpcode::Return => {
                // Stack: [value]
                push_byte(asm, 0);
                op(asm, Opcode::MSTORE);
                push_byte(asm, EVM_WORD_SIZE);
                push_byte(asm, 0);
                op(asm, Opcode::RETURN);
            }

            IrOpcode::BeginScope
            | IrOpcode::Exponential
            | IrOpcode::Diff
            | IrOpcode::Equals
            | IrOpcode::Bigger
            | IrOpcode::Smaller
            | IrOpcode::And
            | IrOpcode::Or
            | IrOpcode::PushArg
            | IrOpcode::Defer
            | IrOpcode::PreCall
            | IrOpcode::Call
            | IrOpcode::If
            | IrOpcode::Jump
            | IrOpcode::Result
            | IrOpcode::Print
            | IrOpcode::Pull
            | IrOpcode::Head
            | IrOpcode::Tail
            | IrOpcode::Push
            | IrOpcode::Assert
            | IrOpcode::Echo => {
                return Err(CodegenError::Unsupported {
                    label: inst.label.clone(),
                    opcode: inst.opcode,
                });
            }
        }
        Ok(())
    }
}
