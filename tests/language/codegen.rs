//! Integration tests for generated instruction sequences

use cafelisp_classfile::{Constant, Instruction};
use cafelisp_language::compile_chars;

fn code(source: &str) -> Vec<Instruction> {
    compile_chars(source.chars())
        .unwrap()
        .code
        .instructions()
        .to_vec()
}

// =============================================================================
// print
// =============================================================================

#[test]
fn print_long_uses_wide_load_and_long_overload() {
    let program = compile_chars("(print 7)".chars()).unwrap();
    let ops = program.code.instructions();
    let Instruction::InvokeVirtual(print) = ops[3] else {
        panic!("expected invokevirtual, got {ops:?}");
    };
    let Some(Constant::MethodRef { name_and_type, .. }) = program.pool.get(print) else {
        panic!("expected a method ref");
    };
    let Some(Constant::NameAndType { descriptor, .. }) = program.pool.get(*name_and_type) else {
        panic!("expected a name-and-type");
    };
    assert_eq!(
        program.pool.get(*descriptor),
        Some(&Constant::Utf8("(J)V".to_string()))
    );
    assert!(matches!(ops[2], Instruction::Ldc2W(_)));
    // handle, duplicate, two-word long
    assert_eq!(program.code.max_depth(), 4);
}

#[test]
fn print_leaves_nothing_behind() {
    let program = compile_chars("(print \"a\" (+ 1 2) \"b\")".chars()).unwrap();
    assert_eq!(program.code.depth(), 0);
}

#[test]
fn empty_print_is_just_a_newline() {
    let ops = code("(print)");
    assert!(matches!(
        ops.as_slice(),
        [
            Instruction::GetStatic(_),
            Instruction::InvokeVirtual(_),
            Instruction::Return
        ]
    ));
}

// =============================================================================
// +
// =============================================================================

#[test]
fn two_operand_sum() {
    let ops = code("(+ 1 2)");
    assert!(matches!(
        ops.as_slice(),
        [
            Instruction::Ldc2W(_),
            Instruction::Ldc2W(_),
            Instruction::Ladd,
            Instruction::Return
        ]
    ));
}

#[test]
fn nested_sum_depth() {
    let program = compile_chars("(+ 1 (+ 2 3))".chars()).unwrap();
    // 1, then 2 and 3 on top of it
    assert_eq!(program.code.max_depth(), 6);
    assert_eq!(program.code.depth(), 2);
}

#[test]
fn top_level_values_stay_on_the_stack() {
    let program = compile_chars("1 \"two\"".chars()).unwrap();
    assert_eq!(program.code.depth(), 3);
    assert_eq!(program.code.instructions().last(), Some(&Instruction::Return));
}
