//! Memory slots for bound identifiers
//!
//! Every `Ident` gets the next free 32-byte word, starting at `0x00`. Offsets are pushed with a
//! single `PUSH1`, so only eight slots (`0x00..=0xe0`) are addressable.

use crate::error::{CodegenError, Result};
use aurora_ir_data::Label;
use std::collections::HashMap;

pub const SLOT_SIZE: usize = 32;

/// Number of slots whose offset fits in one byte.
pub const MAX_IDENTIFIERS: usize = u8::MAX as usize / SLOT_SIZE + 1;

/// Name to memory offset table, shared by every body of one compilation
#[derive(Debug, Default)]
pub struct IdentTable {
    offsets: HashMap<Vec<u8>, u8>,
    declared: usize,
}

impl IdentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a fresh slot. A rebound name moves to the new slot.
    pub fn declare(&mut self, name: &[u8]) -> Result<u8> {
        let offset = u8::try_from(self.declared * SLOT_SIZE).map_err(|_| {
            CodegenError::TooManyIdentifiers { name: Label::from(name), limit: MAX_IDENTIFIERS }
        })?;
        self.offsets.insert(name.to_vec(), offset);
        self.declared += 1;
        Ok(offset)
    }

    pub fn offset_of(&self, name: &[u8]) -> Result<u8> {
        self.offsets
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnboundIdentifier { name: Label::from(name) })
    }

    /// Number of declarations so far, rebindings included
    pub fn len(&self) -> usize {
        self.declared
    }

    pub fn is_empty(&self) -> bool {
        self.declared == 0
    }
}
