//! Splitting the lowered stream into selector-addressed segments and root code

use super::{Translator, dispatcher::selector};
use crate::error::{CodegenError, Result};
use aurora_ir_data::{Instruction, Label, Opcode};
use tracing::debug;

/// One callable body placed after the dispatcher table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Name hashed into the dispatcher selector
    pub selector_name: Label,
    /// Position of the leading `JUMPDEST`, relative to the first segment
    pub offset: usize,
    /// Length of the body, without the `JUMPDEST`
    pub length: usize,
    /// `JUMPDEST` followed by the body
    pub code: Vec<u8>,
}

impl Segment {
    pub fn selector(&self) -> [u8; 4] {
        selector(self.selector_name.as_bytes())
    }

    pub fn body(&self) -> &[u8] {
        &self.code[1..]
    }
}

const JUMPDEST: u8 = 0x5b;

impl Translator {
    /// Translate every named scope into a segment. Instructions outside any scope are returned
    /// in order as the root body.
    pub(super) fn pick_segments(&mut self, stream: &[Instruction]) -> Result<Vec<Instruction>> {
        let mut root = Vec::new();
        let mut cursor = 0;

        while let Some(inst) = stream.get(cursor) {
            if inst.opcode != Opcode::BeginScope {
                root.push(inst.clone());
                cursor += 1;
                continue;
            }

            let end = scope_end(stream, cursor)?;
            let body = &stream[cursor + 1..=end];

            match stream.get(end + 1) {
                Some(next)
                    if next.opcode == Opcode::Ident && next.right == inst.label.as_bytes() =>
                {
                    let name = Label::new(next.left.clone());
                    self.push_segment(name, body)?;
                    cursor = end + 2;
                }
                _ => {
                    debug!(scope = %inst.label, "skipping anonymous scope");
                    cursor = end + 1;
                }
            }
        }

        Ok(root)
    }

    fn push_segment(&mut self, name: Label, body: &[Instruction]) -> Result<()> {
        let bytes = self.write_body(body)?;
        let mut code = Vec::with_capacity(bytes.len() + 1);
        code.push(JUMPDEST);
        code.extend_from_slice(&bytes);

        let segment = Segment {
            selector_name: name,
            offset: self.state.next_offset,
            length: bytes.len(),
            code,
        };
        debug!(
            name = %segment.selector_name,
            offset = segment.offset,
            length = segment.length,
            selector = ?segment.selector(),
            "picked segment"
        );
        self.state.next_offset += 1 + segment.length;
        self.state.segments.push(segment);
        Ok(())
    }
}

/// Index of the `Return` closing the scope opened at `begin`.
fn scope_end(stream: &[Instruction], begin: usize) -> Result<usize> {
    let scope = &stream[begin];
    let malformed = |reason| CodegenError::MalformedScope { label: scope.label.clone(), reason };

    let count = scope
        .right_u64()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| malformed("instruction count is not a 64-bit number"))?;
    if count == 0 {
        return Err(malformed("scope has no instructions"));
    }
    let end = begin
        .checked_add(count)
        .filter(|&end| end < stream.len())
        .ok_or_else(|| malformed("instruction count runs past the end of the stream"))?;

    let body = &stream[begin + 1..=end];
    if body.last().map(|inst| inst.opcode) != Some(Opcode::Return) {
        return Err(malformed("scope does not end with return"));
    }
    if let Some(nested) = body.iter().find(|inst| inst.opcode == Opcode::BeginScope) {
        return Err(CodegenError::Unsupported {
            label: nested.label.clone(),
            opcode: Opcode::BeginScope,
        });
    }
    Ok(end)
}

