//! End-to-end tests: compile a stream and run it under revm

use crate::tests::helpers::*;
use alloy_primitives::U256;
use aurora_ir_data::{Instruction, Opcode, StreamBuilder};
use revm::primitives::{ExecutionResult, Output};

/// `sub(a, b) = a - b`
fn sub_program() -> Vec<Instruction> {
    let mut b = StreamBuilder::new();
    b.named_scope("sub", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        b.sub(&x, &y)
    });
    b.build()
}

#[test]
fn subtraction_keeps_operand_order() {
    let runtime = compile_runtime(sub_program());
    let result =
        execute_and_get_result(runtime, calldata("sub", &[TEST_OPERAND_A, TEST_OPERAND_B]))
            .expect("sub should return");

    assert_eq!(result, U256::from(7));
}

#[test]
fn division_keeps_operand_order() {
    let mut b = StreamBuilder::new();
    b.named_scope("div", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        b.div(&x, &y)
    });
    let runtime = compile_runtime(b.build());

    let result = execute_and_get_result(runtime, calldata("div", &[100, 4])).unwrap();
    assert_eq!(result, U256::from(25));
}

#[test]
fn subtraction_chain_evaluates_left_to_right() {
    // (a - b) - c
    let mut b = StreamBuilder::new();
    b.named_scope("chain", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        let xy = b.sub(&x, &y);
        let z = b.get_arg(2);
        b.sub(&xy, &z)
    });
    let runtime = compile_runtime(b.build());

    let args = [TEST_OPERAND_A, TEST_OPERAND_B, TEST_OPERAND_C];
    let result = execute_and_get_result(runtime, calldata("chain", &args)).unwrap();
    assert_eq!(result, U256::from(5));
}

#[test]
fn binary_operations_match_evm_semantics() {
    let ops = [Opcode::Add, Opcode::Subtract, Opcode::Multiply, Opcode::Divide];
    for op in ops {
        let mut b = StreamBuilder::new();
        b.named_scope("op", |b| {
            let x = b.get_arg(0);
            let y = b.get_arg(1);
            b.binary(op, &x, &y)
        });
        let runtime = compile_runtime(b.build());

        for (x, y) in BINARY_OP_TEST_CASES {
            let (a, c) = (U256::from(x), U256::from(y));
            let expected = match op {
                Opcode::Add => a.wrapping_add(c),
                Opcode::Subtract => a.wrapping_sub(c),
                Opcode::Multiply => a.wrapping_mul(c),
                _ => a.checked_div(c).unwrap_or_default(),
            };
            let result =
                execute_and_get_result(runtime.clone(), calldata("op", &[x, y])).unwrap();
            assert_eq!(result, expected, "{op:?} {x} {y}");
        }
    }
}

#[test]
fn max_sum_segment_returns_sum() {
    let mut b = StreamBuilder::new();
    b.named_scope("a", |b| {
        let x = b.save_u64(U32_MAX);
        let y = b.save_u64(U32_MAX);
        b.add(&x, &y)
    });
    let runtime = compile_runtime(b.build());

    let result = execute_and_get_result(runtime, calldata("a", &[])).unwrap();
    assert_eq!(result, U256::from(2 * U32_MAX));
}

#[test]
fn dispatch_selects_the_named_segment() {
    let mut b = StreamBuilder::new();
    b.named_scope("add", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        b.add(&x, &y)
    });
    b.named_scope("mul", |b| {
        let x = b.get_arg(0);
        let y = b.get_arg(1);
        b.mul(&x, &y)
    });
    b.named_scope("answer", |b| b.save_u64(42));
    let runtime = compile_runtime(b.build());

    let cases = [("add", [6, 7], 13), ("mul", [6, 7], 42), ("answer", [0, 0], 42)];
    for (name, args, expected) in cases {
        let result = execute_and_get_result(runtime.clone(), calldata(name, &args)).unwrap();
        assert_eq!(result, U256::from(expected), "{name}");
    }
}

#[test]
fn unknown_selector_stops_without_output() {
    let runtime = compile_runtime(sub_program());
    execute_and_verify_stop(runtime.clone(), calldata("nope", &[1, 2])).unwrap();
    execute_and_verify_stop(runtime, Vec::new()).unwrap();
}

#[test]
fn root_code_runs_without_selector() {
    let mut b = StreamBuilder::new();
    let x = b.save_u64(40);
    let y = b.save_u64(2);
    let sum = b.add(&x, &y);
    b.push(Opcode::Return, Vec::new(), sum.as_bytes());
    let runtime = compile_runtime(b.build());

    let result = execute_and_get_result(runtime, Vec::new()).unwrap();
    assert_eq!(result, U256::from(42));
}

#[test]
fn identifiers_round_trip_through_memory() {
    let mut b = StreamBuilder::new();
    b.named_scope("twice", |b| {
        let arg = b.get_arg(0);
        b.ident("n", &arg);
        let n = b.load("n");
        let m = b.load("n");
        b.add(&n, &m)
    });
    let runtime = compile_runtime(b.build());

    let result = execute_and_get_result(runtime, calldata("twice", &[21])).unwrap();
    assert_eq!(result, U256::from(42));
}

#[test]
fn rebinding_reads_the_latest_value() {
    let mut b = StreamBuilder::new();
    b.named_scope("f", |b| {
        let first = b.save_u64(1);
        b.ident("v", &first);
        let second = b.get_arg(0);
        b.ident("v", &second);
        b.load("v")
    });
    let runtime = compile_runtime(b.build());

    let result = execute_and_get_result(runtime, calldata("f", &[9])).unwrap();
    assert_eq!(result, U256::from(9));
}

#[test]
fn deploy_payload_returns_runtime_code() {
    let translator = compile(sub_program());
    let payload = translator.bytecode().to_vec();

    let ExecutionResult::Success { output: Output::Call(installed), .. } =
        execute_raw(payload, Vec::new())
    else {
        panic!("instantiate code should succeed");
    };
    assert_eq!(&installed[..], translator.runtime_code());
}
