use crate::{
    CodegenError, Config, INSTANTIATE_CODE_SIZE, Translator, instantiate_code, tests::helpers::*,
};
use aurora_ir_data::{Opcode, StreamBuilder};

#[test]
fn instantiate_code_layout() {
    let code = instantiate_code(0x2c).unwrap();
    assert_eq!(
        code,
        [PUSH1, 0x2c, PUSH1, 0x0c, PUSH1, 0x00, CODECOPY, PUSH1, 0x2c, PUSH1, 0x00, RETURN]
    );
    assert_eq!(code.len(), usize::from(INSTANTIATE_CODE_SIZE));
}

#[test]
fn runtime_size_limit() {
    assert!(instantiate_code(255).is_ok());
    assert!(matches!(instantiate_code(256), Err(CodegenError::RuntimeTooLarge { size: 256 })));
}

#[test]
fn payload_is_instantiate_then_runtime() {
    let mut b = StreamBuilder::new();
    b.named_scope("a", |b| b.save_u64(1));
    let value = b.save_bool(true);
    b.push(Opcode::Return, Vec::new(), value.as_bytes());

    let translator = compile(b.build());
    let payload = translator.bytecode();
    let runtime = translator.runtime_code();

    assert_eq!(payload.len(), 12 + runtime.len());
    assert_eq!(&payload[..12], &instantiate_code(runtime.len()).unwrap()[..]);
    assert_eq!(&payload[12..], runtime);
}

#[test]
fn second_push_is_always_twelve() {
    let programs = [
        Vec::new(),
        {
            let mut b = StreamBuilder::new();
            b.save_bool(true);
            b.build()
        },
        {
            let mut b = StreamBuilder::new();
            b.named_scope("f", |b| b.get_arg(0));
            b.named_scope("g", |b| b.get_arg(1));
            b.build()
        },
    ];
    for program in programs {
        let payload = compile(program).into_bytecode();
        assert_eq!(payload[2], PUSH1);
        assert_eq!(payload[3], 0x0c);
    }
}

#[test]
fn runtime_only_skips_instantiate() {
    let mut b = StreamBuilder::new();
    b.save_bool(true);
    let mut translator = Translator::with_config(b.build(), Config::runtime_only());
    translator.translate().unwrap();
    assert_eq!(translator.bytecode(), translator.runtime_code());
}

#[test]
fn oversized_runtime_is_rejected() {
    // 30 eight-byte literals: 270 bytes of root code
    let mut b = StreamBuilder::new();
    for i in 0..30 {
        b.save_u64(i);
    }
    let stream = b.build();

    let err = Translator::new(stream.clone()).translate().unwrap_err();
    assert!(matches!(err, CodegenError::RuntimeTooLarge { size: 271 }), "unexpected error: {err:?}");

    let mut translator = Translator::with_config(stream, Config::runtime_only());
    assert!(translator.translate().is_ok());
    assert_eq!(translator.runtime_code().len(), 271);
}

#[test]
fn write_to_sink() {
    let mut b = StreamBuilder::new();
    b.save_bool(true);
    let translator = compile(b.build());

    let mut sink = Vec::new();
    translator.write_to(&mut sink).unwrap();
    assert_eq!(sink, translator.bytecode());
}
