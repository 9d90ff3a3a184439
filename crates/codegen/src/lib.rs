//! EVM Bytecode Generator for the Aurora instruction stream
//!
//! Compiles the flat, labeled instruction stream produced by the Aurora IR emitter into a
//! deployment payload: a fixed 12-byte instantiate code followed by the runtime code.
//!
//! ## Pipeline
//! 1. Operand lowering reorders pure operands so stack order matches EVM operand order.
//! 2. The segment picker turns each named scope into a selector-addressed segment and collects
//!    everything else into the root body.
//! 3. The code writer translates each body, sharing one identifier table across the program.
//! 4. The dispatcher table routes calldata selectors to segments, then the instantiate code is
//!    prepended.
//!
//! ## Memory Layout
//! - `0x00-0xFF`: identifier slots, 32 bytes each, in declaration order
//! - `0x00-0x1F`: also the return buffer, written last by `Return`
//!
//! ## Calldata Layout
//! - bytes `0..4`: ABI selector, padded to a full word
//! - word `i + 1`: argument `i`
//!
//! All offsets, jump targets and the runtime size are pushed as single bytes, so programs are
//! limited to 255 bytes of runtime code and 8 identifier slots.

pub mod disasm;
mod error;
pub mod idents;
pub mod lowering;
mod translator;


// Public exports
pub use error::{CodegenError, Result};
pub use translator::{
    DISPATCHER_SIZE, FALLBACK_SIZE, INSTANTIATE_CODE_SIZE, Segment, Translator, instantiate_code,
    selector, translate_program,
};

/// Translator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Prepend the instantiate code. Disable to get the runtime code alone.
    pub emit_instantiate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { emit_instantiate: true }
    }
}

impl Config {
    pub fn runtime_only() -> Self {
        Self { emit_instantiate: false }
    }
}

/// Calldata offset of argument `index`; the first word holds the selector.
pub fn calldata_args_offset(index: u64) -> Option<u8> {
    index.checked_add(1)?.checked_mul(32).and_then(|offset| u8::try_from(offset).ok())
}
