//! Instruction stream opcodes and their wire tags.

use std::fmt;

/// Every opcode the IR emitter can produce.
///
/// The discriminant is the byte tag used by the wire codec, so the order of the variants is part
/// of the encoding and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    Multiply = 0x01,
    Add = 0x02,
    Subtract = 0x03,
    Divide = 0x04,
    Exponential = 0x05,
    Ident = 0x06,
    Save = 0x07,
    Load = 0x08,
    Diff = 0x09,
    Equals = 0x0a,
    Bigger = 0x0b,
    Smaller = 0x0c,
    And = 0x0d,
    Or = 0x0e,
    PushArg = 0x0f,
    GetArg = 0x10,
    BeginScope = 0x11,
    Defer = 0x12,
    PreCall = 0x13,
    Call = 0x14,
    If = 0x15,
    Jump = 0x16,
    Return = 0x17,
    Result = 0x18,
    Print = 0x19,
    Pull = 0x1a,
    Head = 0x1b,
    Tail = 0x1c,
    Push = 0x1d,
    Assert = 0x1e,
    Echo = 0x1f,
}

impl Opcode {
    pub const ALL: [Opcode; 31] = [
        Opcode::Multiply,
        Opcode::Add,
        Opcode::Subtract,
        Opcode::Divide,
        Opcode::Exponential,
        Opcode::Ident,
        Opcode::Save,
        Opcode::Load,
        Opcode::Diff,
        Opcode::Equals,
        Opcode::Bigger,
        Opcode::Smaller,
        Opcode::And,
        Opcode::Or,
        Opcode::PushArg,
        Opcode::GetArg,
        Opcode::BeginScope,
        Opcode::Defer,
        Opcode::PreCall,
        Opcode::Call,
        Opcode::If,
        Opcode::Jump,
        Opcode::Return,
        Opcode::Result,
        Opcode::Print,
        Opcode::Pull,
        Opcode::Head,
        Opcode::Tail,
        Opcode::Push,
        Opcode::Assert,
        Opcode::Echo,
    ];

    /// Wire tag of this opcode.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        if tag == 0 || tag as usize > Self::ALL.len() {
            return None;
        }
        Some(Self::ALL[tag as usize - 1])
    }

    /// Instructions that only put a value on the stack: arguments, literals and loads.
    pub const fn is_pure_operand(self) -> bool {
        matches!(self, Opcode::GetArg | Opcode::Save | Opcode::Load)
    }

    /// Arithmetic that consumes the values named by `left` and `right`.
    pub const fn is_binary(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Subtract | Opcode::Multiply | Opcode::Divide)
    }

    /// Binary operators whose result depends on operand order.
    pub const fn is_order_sensitive(self) -> bool {
        matches!(self, Opcode::Subtract | Opcode::Divide)
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Multiply => "mul",
            Opcode::Add => "add",
            Opcode::Subtract => "sub",
            Opcode::Divide => "div",
            Opcode::Exponential => "exp",
            Opcode::Ident => "ident",
            Opcode::Save => "save",
            Opcode::Load => "load",
            Opcode::Diff => "diff",
            Opcode::Equals => "equals",
            Opcode::Bigger => "bigger",
            Opcode::Smaller => "smaller",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::PushArg => "pusharg",
            Opcode::GetArg => "getarg",
            Opcode::BeginScope => "beginscope",
            Opcode::Defer => "defer",
            Opcode::PreCall => "precall",
            Opcode::Call => "call",
            Opcode::If => "if",
            Opcode::Jump => "jump",
            Opcode::Return => "return",
            Opcode::Result => "result",
            Opcode::Print => "print",
            Opcode::Pull => "pull",
            Opcode::Head => "head",
            Opcode::Tail => "tail",
            Opcode::Push => "push",
            Opcode::Assert => "assert",
            Opcode::Echo => "echo",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag).ok_or(tag)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
