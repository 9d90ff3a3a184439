//! Tests for selector dispatch and runtime layout

use crate::{
    CodegenError, DISPATCHER_SIZE, FALLBACK_SIZE, Translator, selector,
    tests::helpers::*,
    translator::emit_dispatcher,
};
use aurora_ir_data::StreamBuilder;
use evm_glue::assembler::assemble_minimized;

#[test]
fn selector_is_truncated_keccak() {
    assert_eq!(selector(b"test"), [0x9c, 0x22, 0xff, 0x5f]);
}

#[test]
fn dispatcher_block_layout() {
    let mut asm = Vec::new();
    emit_dispatcher(&mut asm, selector(b"test"), 10);
    let (_, bytecode) = assemble_minimized(&asm, true).expect("dispatcher should assemble");

    assert_eq!(
        bytecode,
        [
            PUSH1, 0x00, CALLDATALOAD, PUSH1, 0xe0, SHR, PUSH4, 0x9c, 0x22, 0xff, 0x5f, EQ, PUSH1,
            0x0a, JUMPI
        ]
    );
    assert_eq!(bytecode.len(), DISPATCHER_SIZE);
}

#[test]
fn jump_targets_land_on_segment_jumpdests() {
    let mut b = StreamBuilder::new();
    b.named_scope("first", |b| b.save_u64(1));
    b.named_scope("second", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        b.sub(&x, &y)
    });
    b.named_scope("third", |b| b.save_bool(true));

    let translator = compile(b.build());
    let runtime = translator.runtime_code();
    let segments = translator.segments();
    let n = segments.len();

    for (i, segment) in segments.iter().enumerate() {
        let block = &runtime[i * DISPATCHER_SIZE..(i + 1) * DISPATCHER_SIZE];
        assert_eq!(&block[7..11], &segment.selector());

        let target = usize::from(block[13]);
        assert_eq!(target, DISPATCHER_SIZE * n + FALLBACK_SIZE + segment.offset);
        assert_eq!(runtime[target], JUMPDEST);
        assert_eq!(&runtime[target..target + segment.code.len()], &segment.code[..]);
    }
    assert_eq!(runtime[DISPATCHER_SIZE * n], STOP);
}

#[test]
fn runtime_layout_with_root() {
    let mut b = StreamBuilder::new();
    b.named_scope("a", |b| b.save_bool(true));
    b.save_bool(false);

    let translator = compile(b.build());
    let segment = &translator.segments()[0];

    let mut expected = translator.runtime_code()[..DISPATCHER_SIZE].to_vec();
    expected.push(STOP);
    expected.extend_from_slice(&segment.code);
    expected.extend_from_slice(translator.root_code());
    assert_eq!(translator.runtime_code(), expected);
    assert_eq!(translator.root_code(), [PUSH1, 0x00, STOP]);
}

#[test]
fn no_segments_means_no_table() {
    let mut b = StreamBuilder::new();
    b.get_arg(0);
    let runtime = compile_runtime(b.build());
    assert_eq!(runtime, [PUSH1, 0x20, CALLDATALOAD, STOP]);
}

#[test]
fn jump_target_must_fit_in_a_byte() {
    // 17 dispatcher blocks alone exceed 255 bytes
    let mut b = StreamBuilder::new();
    for i in 0..17 {
        b.named_scope(&format!("f{i}"), |b| b.save_bool(true));
    }
    let err = Translator::new(b.build()).translate().unwrap_err();
    assert!(
        matches!(&err, CodegenError::JumpTargetOutOfRange { target, .. } if *target > 255),
        "unexpected error: {err:?}"
    );
}
