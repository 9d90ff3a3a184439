//! Selector dispatch table and runtime code layout
//!
//! Runtime layout with `N` segments:
//! - `N` dispatcher blocks of [`DISPATCHER_SIZE`] bytes
//! - a single `STOP` reached when no selector matched
//! - every segment's `JUMPDEST ++ body`, in offset order
//! - the root body, if any
//!
//! Without segments the runtime code is the root body alone.

use super::{
    Translator,
    constants::SELECTOR_SHIFT,
    helpers::{assemble, op, push_byte},
};
use crate::error::{CodegenError, Result};
use alloy_primitives::keccak256;
use evm_glue::{assembly::Asm, opcodes::Opcode};
use tracing::debug;

/// `PUSH1 0, CALLDATALOAD, PUSH1 224, SHR, PUSH4 sel, EQ, PUSH1 target, JUMPI`
pub const DISPATCHER_SIZE: usize = 15;

/// Size of the no-match `STOP` between the table and the first segment
pub const FALLBACK_SIZE: usize = 1;

/// ABI selector of `name`: the first four bytes of its keccak256 hash
pub fn selector(name: &[u8]) -> [u8; 4] {
    let hash = keccak256(name);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Append the block that jumps to `target` when the calldata selector equals `selector`.
pub(crate) fn emit_dispatcher(asm: &mut Vec<Asm>, selector: [u8; 4], target: u8) {
    push_byte(asm, 0);
    op(asm, Opcode::CALLDATALOAD);
    push_byte(asm, SELECTOR_SHIFT);
    op(asm, Opcode::SHR);
    op(asm, Opcode::PUSH4(selector));
    op(asm, Opcode::EQ);
    push_byte(asm, target);
    op(asm, Opcode::JUMPI);
}

impl Translator {
    pub(super) fn assemble_runtime(&self) -> Result<Vec<u8>> {
        let segments = &self.state.segments;
        let mut asm = Vec::new();

        if !segments.is_empty() {
            let table_size = DISPATCHER_SIZE * segments.len() + FALLBACK_SIZE;
            for segment in segments {
                let target = table_size + segment.offset;
                let jump = u8::try_from(target).map_err(|_| CodegenError::JumpTargetOutOfRange {
                    segment: segment.selector_name.clone(),
                    target,
                })?;
                emit_dispatcher(&mut asm, segment.selector(), jump);
            }
            op(&mut asm, Opcode::STOP);
            debug!(entries = segments.len(), size = table_size, "emitted dispatcher table");

            for segment in segments {
                asm.push(Asm::Data(segment.code.clone()));
            }
        }

        if !self.state.root.is_empty() {
            asm.push(Asm::Data(self.state.root.clone()));
        }

        assemble(&asm)
    }
}
