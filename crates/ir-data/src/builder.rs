use crate::{Instruction, Label, Opcode};

/// Fluent construction of instruction streams.
///
/// Labels are generated in emission order (`"0"`, `"1"`, ...) the same way the IR emitter does,
/// so streams built here look like the emitter's output.
#[derive(Debug, Default)]
pub struct StreamBuilder {
    instructions: Vec<Instruction>,
    next_label: u32,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_label(&mut self) -> Label {
        let label = Label::new(self.next_label.to_string());
        self.next_label += 1;
        label
    }

    /// Appends a raw instruction with a fresh label and returns that label.
    pub fn push(
        &mut self,
        opcode: Opcode,
        left: impl Into<Vec<u8>>,
        right: impl Into<Vec<u8>>,
    ) -> Label {
        let label = self.next_label();
        self.instructions.push(Instruction::new(label.clone(), opcode, left, right));
        label
    }

    pub fn save_u64(&mut self, value: u64) -> Label {
        self.push(Opcode::Save, value.to_be_bytes(), Vec::new())
    }

    pub fn save_bool(&mut self, value: bool) -> Label {
        self.push(Opcode::Save, vec![u8::from(value)], Vec::new())
    }

    pub fn save_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> Label {
        self.push(Opcode::Save, bytes, Vec::new())
    }

    pub fn get_arg(&mut self, index: u64) -> Label {
        self.push(Opcode::GetArg, index.to_be_bytes(), Vec::new())
    }

    pub fn load(&mut self, name: &str) -> Label {
        self.push(Opcode::Load, name, Vec::new())
    }

    pub fn binary(&mut self, opcode: Opcode, left: &Label, right: &Label) -> Label {
        debug_assert!(opcode.is_binary(), "{opcode:?} is not a binary operator");
        self.push(opcode, left.as_bytes(), right.as_bytes())
    }

    pub fn add(&mut self, left: &Label, right: &Label) -> Label {
        self.binary(Opcode::Add, left, right)
    }

    pub fn sub(&mut self, left: &Label, right: &Label) -> Label {
        self.binary(Opcode::Subtract, left, right)
    }

    pub fn mul(&mut self, left: &Label, right: &Label) -> Label {
        self.binary(Opcode::Multiply, left, right)
    }

    pub fn div(&mut self, left: &Label, right: &Label) -> Label {
        self.binary(Opcode::Divide, left, right)
    }

    /// Binds `name` to the value produced by `value`.
    pub fn ident(&mut self, name: &str, value: &Label) -> Label {
        self.push(Opcode::Ident, name, value.as_bytes())
    }

    /// Emits `BeginScope`, the body produced by `body` and the closing `Return` of the value the
    /// body evaluates to. The `BeginScope` count covers every body instruction plus the `Return`.
    pub fn scope(&mut self, body: impl FnOnce(&mut Self) -> Label) -> Label {
        let begin = self.instructions.len();
        let scope = self.push(Opcode::BeginScope, Vec::new(), Vec::new());
        let value = body(self);
        self.push(Opcode::Return, scope.as_bytes(), value.as_bytes());

        let count = (self.instructions.len() - begin - 1) as u64;
        self.instructions[begin].right = count.to_be_bytes().to_vec();
        scope
    }

    /// A scope immediately followed by the `Ident` that names it, which is what makes it callable.
    pub fn named_scope(&mut self, name: &str, body: impl FnOnce(&mut Self) -> Label) -> Label {
        let scope = self.scope(body);
        self.ident(name, &scope);
        scope
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn build(self) -> Vec<Instruction> {
        self.instructions
    }
}
