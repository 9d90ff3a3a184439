//! Translator from the Aurora instruction stream to EVM bytecode

mod dispatcher;
mod helpers;
mod initialization;
mod segments;
mod writer;

/// Common constants used throughout the translator
mod constants {
    /// Initial capacity estimate multiplier for assembly instructions
    /// Most instructions translate to approximately this many assembly instructions
    pub const ASM_INSTRUCTIONS_PER_OPERATION: usize = 3;

    /// Right shift that moves the 4-byte ABI selector to the low end of a calldata word
    pub const SELECTOR_SHIFT: u8 = 224;

    /// EVM word size in bytes
    pub const EVM_WORD_SIZE: u8 = 32;
}

#[cfg(test)]
pub(crate) use dispatcher::emit_dispatcher;
pub use dispatcher::{DISPATCHER_SIZE, FALLBACK_SIZE, selector};
pub use initialization::{INSTANTIATE_CODE_SIZE, instantiate_code};
pub use segments::Segment;

use crate::{
    Config,
    error::Result,
    idents::IdentTable,
    lowering::{check_references, lower},
};
use aurora_ir_data::Instruction;
use std::io::Write;
use tracing::debug;

/// Mutable translation state, rebuilt on every `translate` call
#[derive(Debug, Default)]
pub(crate) struct TranslationState {
    pub(crate) idents: IdentTable,
    pub(crate) segments: Vec<Segment>,
    pub(crate) next_offset: usize,
    pub(crate) root: Vec<u8>,
    pub(crate) runtime: Vec<u8>,
    pub(crate) bytecode: Vec<u8>,
}

/// Main translator from an instruction stream to EVM bytecode
pub struct Translator {
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) state: TranslationState,
    pub(crate) config: Config,
}

impl Translator {
    /// Create a new translator for the given stream with default configuration
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self::with_config(instructions, Config::default())
    }

    /// Create a new translator for the given stream with custom configuration
    pub fn with_config(instructions: Vec<Instruction>, config: Config) -> Self {
        Self { instructions, state: TranslationState::default(), config }
    }

    /// Lower, split and translate the stream into the final payload
    pub fn translate(&mut self) -> Result<()> {
        check_references(&self.instructions)?;
        let lowered = lower(&self.instructions);
        self.state = TranslationState::default();

        let root = self.pick_segments(&lowered)?;
        if !root.is_empty() {
            self.state.root = self.write_body(&root)?;
        }

        let runtime = self.assemble_runtime()?;
        let mut bytecode = Vec::new();
        if self.config.emit_instantiate {
            bytecode = instantiate_code(runtime.len())?;
        }
        bytecode.extend_from_slice(&runtime);

        debug!(
            segments = self.state.segments.len(),
            runtime = runtime.len(),
            total = bytecode.len(),
            "translated instruction stream"
        );
        self.state.runtime = runtime;
        self.state.bytecode = bytecode;
        Ok(())
    }

    /// Named segments in dispatch order
    pub fn segments(&self) -> &[Segment] {
        &self.state.segments
    }

    /// Code executed when no segment is selected
    pub fn root_code(&self) -> &[u8] {
        &self.state.root
    }

    pub fn runtime_code(&self) -> &[u8] {
        &self.state.runtime
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.state.bytecode
    }

    /// Write the payload to `sink`
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.state.bytecode)?;
        Ok(())
    }

    /// Get the generated payload
    pub fn into_bytecode(self) -> Vec<u8> {
        self.state.bytecode
    }
}

/// High-level function to translate a stream to a deployable payload
pub fn translate_program(instructions: Vec<Instruction>) -> Result<Vec<u8>> {
    let mut translator = Translator::new(instructions);
    translator.translate()?;
    Ok(translator.into_bytecode())
}
