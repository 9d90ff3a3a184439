//! Operand lowering
//!
//! Reorders the stream so that translating it one instruction at a time leaves every operand
//! where the EVM expects it. EVM `SUB`/`DIV` compute `top OP second`, so for order-sensitive
//! operators the right operand block is emitted first and the left block ends up on top. For
//! `ADD`/`MUL` the natural order is kept.
//!
//! Pure operands (`GetArg`, `Save`, `Load`) are held back in a pool keyed by their label and only
//! released when a consumer needs them. Merged blocks go back into the pool under the consuming
//! instruction's label so enclosing operators can reorder whole sub-expressions.

use crate::error::{CodegenError, Result};
use aurora_ir_data::{Instruction, Label, Opcode};
use std::collections::HashSet;
use tracing::debug;

/// Pending operand blocks in insertion order
#[derive(Debug, Default)]
struct OperandPool {
    entries: Vec<(Label, Vec<Instruction>)>,
}

impl OperandPool {
    fn contains(&self, label: &[u8]) -> bool {
        self.entries.iter().any(|(l, _)| l.as_bytes() == label)
    }

    fn insert(&mut self, label: Label, block: Vec<Instruction>) {
        self.entries.push((label, block));
    }

    fn take(&mut self, label: &[u8]) -> Option<Vec<Instruction>> {
        let idx = self.entries.iter().position(|(l, _)| l.as_bytes() == label)?;
        Some(self.entries.remove(idx).1)
    }

    fn drain_into(&mut self, out: &mut Vec<Instruction>) {
        for (_, block) in self.entries.drain(..) {
            out.extend(block);
        }
    }
}

/// Reorder `stream` for stack translation. The output holds exactly the input instructions.
pub fn lower(stream: &[Instruction]) -> Vec<Instruction> {
    let mut pool = OperandPool::default();
    let mut out = Vec::with_capacity(stream.len());

    for inst in stream {
        match inst.opcode {
            op if op.is_pure_operand() => pool.insert(inst.label.clone(), vec![inst.clone()]),
            op if op.is_binary() => {
                let both_pooled = inst.left != inst.right
                    && pool.contains(&inst.left)
                    && pool.contains(&inst.right);
                if both_pooled {
                    let left = pool.take(&inst.left).unwrap_or_default();
                    let right = pool.take(&inst.right).unwrap_or_default();
                    let (first, second) =
                        if op.is_order_sensitive() { (right, left) } else { (left, right) };

                    let mut block = first;
                    block.extend(second);
                    block.push(inst.clone());
                    pool.insert(inst.label.clone(), block);
                } else {
                    for operand in [&inst.left, &inst.right] {
                        if let Some(block) = pool.take(operand) {
                            out.extend(block);
                        }
                    }
                    out.push(inst.clone());
                }
            }
            Opcode::Return => {
                let value = pool.take(&inst.right);
                pool.drain_into(&mut out);
                out.extend(value.into_iter().flatten());
                out.push(inst.clone());
            }
            Opcode::Ident => {
                if let Some(block) = pool.take(&inst.right) {
                    out.extend(block);
                }
                out.push(inst.clone());
            }
            Opcode::BeginScope => {
                pool.drain_into(&mut out);
                out.push(inst.clone());
            }
            _ => out.push(inst.clone()),
        }
    }
    pool.drain_into(&mut out);

    debug!(instructions = stream.len(), "lowered operand order");
    out
}

/// Every label referenced by an operand must be defined by an earlier instruction.
pub fn check_references(stream: &[Instruction]) -> Result<()> {
    let mut defined: HashSet<&[u8]> = HashSet::with_capacity(stream.len());
    for inst in stream {
        let (left, right) = inst.references();
        for operand in [left, right].into_iter().flatten() {
            if !defined.contains(operand) {
                return Err(CodegenError::DanglingReference {
                    label: inst.label.clone(),
                    operand: Label::from(operand),
                });
            }
        }
        defined.insert(inst.label.as_bytes());
    }
    Ok(())
}
