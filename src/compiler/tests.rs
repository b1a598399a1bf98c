//! Unit tests for the lowering pass.

use inkwell::{context::Context, types::BasicTypeEnum};

use crate::{
    ast::ast::Program, errors::errors::LoweringError, lexer::lexer::Lexer, parser::parser::parse,
};

use super::compiler::{compile, GLOBAL_INIT_FUNCTION};

fn parse_program(source: &str) -> Program {
    let lexer = Lexer::new(source.to_string(), Some("test.lt".to_string()));
    let file = lexer.file();
    let (_, result) = parse(lexer, file);

    result.unwrap()
}

fn lower(source: &str) -> Result<String, LoweringError> {
    let program = parse_program(source);
    let context = Context::create();
    let compiler = compile(&program, "test", &context)?;

    Ok(compiler.print_to_string())
}

#[test]
fn test_lower_empty_program() {
    let context = Context::create();
    let compiler = compile(&Program::default(), "empty", &context).unwrap();

    assert!(compiler.module.get_function(GLOBAL_INIT_FUNCTION).is_none());
    assert!(compiler.module.get_global("llvm.global_ctors").is_none());
}

#[test]
fn test_lower_function_signature() {
    let program = parse_program("fn add(a: int32, b: int32): int32 { return a + b; }");
    let context = Context::create();
    let compiler = compile(&program, "test", &context).unwrap();

    let add = compiler.module.get_function("add").unwrap();
    assert_eq!(add.count_params(), 2);
    assert_eq!(
        add.get_type().get_return_type(),
        Some(BasicTypeEnum::IntType(context.i32_type()))
    );

    let ir = compiler.print_to_string();
    assert!(ir.contains("add i32"));
    assert!(ir.contains("ret i32"));
}

#[test]
fn test_lower_arithmetic_instructions() {
    let ir = lower("fn f(a: int32): int32 { return -a * 2 - a / 3; }").unwrap();

    assert!(ir.contains("mul i32"));
    assert!(ir.contains("sdiv i32"));
    assert!(ir.contains("sub i32"));
}

#[test]
fn test_lower_float_arithmetic() {
    let ir = lower("fn f() {\nvar x = 1.5\nvar y = x * 2.0 + 0.5\nvar z = -x\n}").unwrap();

    assert!(ir.contains("fmul float"));
    assert!(ir.contains("fadd float"));
    assert!(ir.contains("fneg float"));
}

#[test]
fn test_lower_globals() {
    let program = parse_program("var x: int32 = 1\nvar y = x + 2\n");
    let context = Context::create();
    let compiler = compile(&program, "test", &context).unwrap();

    let x = compiler.module.get_global("x").unwrap();
    assert!(x.get_initializer().is_some());
    assert!(compiler.module.get_global("y").is_some());
    assert!(compiler.globals.contains_key("y"));

    assert!(compiler.module.get_function(GLOBAL_INIT_FUNCTION).is_some());
    assert!(compiler.module.get_global("llvm.global_ctors").is_some());
}

#[test]
fn test_lower_string_literal() {
    let program = parse_program("var s: string = \"hi\"\n");
    let context = Context::create();
    let compiler = compile(&program, "test", &context).unwrap();

    let storage = compiler.globals.get("s").unwrap();
    assert_eq!(
        storage.value_type,
        BasicTypeEnum::StructType(compiler.string_type())
    );

    let ir = compiler.print_to_string();
    assert!(ir.contains("%String = type { i32, i8* }"));
    assert!(ir.contains("c\"hi\\00\""));
}

#[test]
fn test_lower_string_arguments() {
    lower("fn greet(name: string) {\n}\ngreet(\"a\")\n").unwrap();
}

#[test]
fn test_lower_forward_call() {
    let ir = lower("fn main(): int32 {\nhelper(2)\nreturn 0\n}\nfn helper(n: int32) {\n}\n").unwrap();
    assert!(ir.contains("call void @helper(i32 2)"));
}

#[test]
fn test_lower_void_variable_from_void_call() {
    let program = parse_program("fn hello() {\n}\nvar x = hello()\n");
    let context = Context::create();
    let compiler = compile(&program, "test", &context).unwrap();

    assert_eq!(
        compiler.globals.get("x").unwrap().value_type,
        BasicTypeEnum::IntType(context.i8_type())
    );
}

#[test]
fn test_lower_void_call_as_operand() {
    let result = lower("fn hello() {\n}\nvar x = hello() + 1\n");

    assert!(matches!(
        result,
        Err(LoweringError::VoidValue { function }) if function == "hello"
    ));
}

#[test]
fn test_lower_nested_function() {
    let result = lower("fn outer() {\nfn inner() {\n}\n}\n");

    assert!(matches!(
        result,
        Err(LoweringError::NestedFunction { function, outer }) if function == "inner" && outer == "outer"
    ));
}

#[test]
fn test_lower_return_outside_function() {
    assert!(matches!(
        lower("return 1\n"),
        Err(LoweringError::ReturnOutsideFunction)
    ));
}

#[test]
fn test_lower_argument_used_outside_its_function() {
    // Accepted by the parser's single variable table, but there is no storage
    let result = lower("fn f(a: int32) {}\nvar b: int32 = a");

    assert!(matches!(
        result,
        Err(LoweringError::UnresolvedStorage { name, .. }) if name == "a"
    ));
}

#[test]
fn test_lower_string_concatenation() {
    assert!(matches!(
        lower("var s: string = \"a\" + \"b\""),
        Err(LoweringError::Unsupported(_))
    ));
}

#[test]
fn test_lower_mixed_operands() {
    assert!(matches!(
        lower("var x = 1 + 2.5"),
        Err(LoweringError::MismatchedOperands { .. })
    ));
}

#[test]
fn test_lower_reassignment_type_change() {
    assert!(matches!(
        lower("var x = 1\nx = 2.5\n"),
        Err(LoweringError::StorageTypeMismatch { name, .. }) if name == "x"
    ));
}

#[test]
fn test_lower_void_function_return() {
    let ir = lower("fn f() {\nreturn 1\n}\nfn g() {\nvar x = 1\n}\nfn h() {}\n").unwrap();
    assert_eq!(ir.matches("ret void").count(), 3);
}

#[test]
fn test_lower_skips_statements_after_return() {
    let ir = lower("fn f(): int32 {\nreturn 1\nvar y = 2\nreturn 2\n}\n").unwrap();

    assert!(ir.contains("ret i32 1"));
    assert!(!ir.contains("ret i32 2"));
}

#[test]
fn test_lower_local_shadows_global() {
    let program = parse_program("var x = 1\nfn f(): int32 {\nvar x: int32 = 2\nreturn x\n}\n");
    let context = Context::create();
    let compiler = compile(&program, "test", &context).unwrap();

    let ir = compiler.print_to_string();
    assert!(ir.contains("alloca i32"));
    assert!(compiler.globals.contains_key("x"));
}
