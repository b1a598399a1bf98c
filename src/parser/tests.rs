//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations and reassignments
//! - Function declarations, calls and forward references
//! - Expressions and operator precedence
//! - Statement terminators
//! - Type verification failures

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expression, Operator, Program, Statement},
        expressions::{
            FloatLiteral, FnCall, Identifier, InfixExpression, IntegerLiteral, PrefixExpression,
            StringLiteral,
        },
        statements::{
            Argument, FnStatement, ReassignVarStatement, ReturnStatement, VarStatement,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, TypeError},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position, MK_TOKEN,
};

use super::parser::{parse, Parser};

fn parse_source(source: &str) -> (Parser, Result<Program, Error>) {
    let lexer = Lexer::new(source.to_string(), Some("test.lt".to_string()));
    let file = lexer.file();
    parse(lexer, file)
}

fn parse_ok(source: &str) -> Program {
    let (_, result) = parse_source(source);
    result.unwrap()
}

fn parse_err(source: &str) -> Error {
    let (_, result) = parse_source(source);
    result.unwrap_err()
}

fn int(value: i32) -> Expression {
    Expression::IntegerLiteral(IntegerLiteral { value })
}

fn ident(value: &str, var_type: Type) -> Expression {
    Expression::Identifier(Identifier {
        value: value.to_string(),
        var_type,
    })
}

fn infix(left: Expression, operator: Operator, right: Expression) -> Expression {
    Expression::Infix(InfixExpression::new(left, operator, right))
}

fn var(name: &str, var_type: Type, value: Expression) -> Statement {
    Statement::Var(VarStatement {
        name: name.to_string(),
        var_type,
        value,
    })
}

#[test]
fn test_parse_empty_program() {
    assert_eq!(parse_ok(""), Program::default());
    assert_eq!(parse_ok("\n\n\n"), Program::default());
}

#[test]
fn test_parse_precedence() {
    let program = parse_ok("var x = 1 + 2 * 3;");

    assert_eq!(
        program.statements,
        vec![var(
            "x",
            Type::Void,
            infix(int(1), Operator::Plus, infix(int(2), Operator::Multiply, int(3)))
        )]
    );
}

#[test]
fn test_parse_left_associative() {
    let program = parse_ok("var x = 10 - 4 - 3;");

    assert_eq!(
        program.statements,
        vec![var(
            "x",
            Type::Void,
            infix(infix(int(10), Operator::Minus, int(4)), Operator::Minus, int(3))
        )]
    );
}

#[test]
fn test_parse_grouping() {
    let program = parse_ok("var x = 2 * (42 + 3.14);");

    assert_eq!(
        program.statements,
        vec![var(
            "x",
            Type::Void,
            infix(
                int(2),
                Operator::Multiply,
                infix(
                    int(42),
                    Operator::Plus,
                    Expression::FloatLiteral(FloatLiteral { value: 3.14 })
                )
            )
        )]
    );
}

#[test]
fn test_parse_prefix_minus() {
    let program = parse_ok("var x: int32 = -5 + 1;");

    assert_eq!(
        program.statements,
        vec![var(
            "x",
            Type::Int32,
            infix(
                Expression::Prefix(PrefixExpression::new(Operator::Minus, int(5))),
                Operator::Plus,
                int(1)
            )
        )]
    );
}

#[test]
fn test_parse_typed_variables() {
    let program = parse_ok("var a: int32 = 1\nvar s: string = \"hi\"\nvar b: int32 = a * 2\n");

    assert_eq!(program.statements.len(), 3);
    assert_eq!(
        program.statements[1],
        var(
            "s",
            Type::String,
            Expression::StringLiteral(StringLiteral {
                value: "hi".to_string()
            })
        )
    );
    assert_eq!(
        program.statements[2],
        var(
            "b",
            Type::Int32,
            infix(ident("a", Type::Int32), Operator::Multiply, int(2))
        )
    );
}

#[test]
fn test_parse_type_mismatch() {
    let error = parse_err("var s: string = 42;");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeVerification {
            source: TypeError::WrongTypeAssignment
        }
    );
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 16);

    let error = parse_err("var x: int32 = 1 + \"a\";");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeVerification { .. }
    ));
}

#[test]
fn test_parse_untyped_identifier_in_typed_context() {
    let error = parse_err("var s = \"a\"\nvar t: string = s\n");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeVerification { .. }
    ));
}

#[test]
fn test_parse_undefined_variable() {
    let error = parse_err("var y = x + 1;");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "x".to_string()
        }
    );
    assert_eq!(error.get_position().column, 8);
}

#[test]
fn test_parse_self_reference_in_declaration() {
    let error = parse_err("var x = x;");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { .. }
    ));
}

#[test]
fn test_parse_reassignment() {
    let program = parse_ok("var x: int32 = 1\nx = x + 2\n");

    assert_eq!(
        program.statements[1],
        Statement::ReassignVar(ReassignVarStatement {
            var_name: "x".to_string(),
            var_type: Type::Int32,
            value: infix(ident("x", Type::Int32), Operator::Plus, int(2)),
        })
    );

    let error = parse_err("var x: int32 = 1; x = \"a\";");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeVerification { .. }
    ));
}

#[test]
fn test_parse_assignment_to_undeclared() {
    let error = parse_err("y = 2;");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "y".to_string()
        }
    );
}

#[test]
fn test_parse_function_declaration() {
    let (parser, result) = parse_source("fn add(a: int32, b: int32): int32 { return a + b; }");
    let program = result.unwrap();

    assert_eq!(
        program.statements,
        vec![Statement::Fn(FnStatement {
            name: "add".to_string(),
            args: vec![
                Argument {
                    name: "a".to_string(),
                    arg_type: Type::Int32
                },
                Argument {
                    name: "b".to_string(),
                    arg_type: Type::Int32
                },
            ],
            return_type: Type::Int32,
            body: vec![Statement::Return(ReturnStatement {
                return_type: Type::Int32,
                value: infix(ident("a", Type::Int32), Operator::Plus, ident("b", Type::Int32)),
            })],
        })]
    );

    let signature = parser.get_function("add").unwrap();
    assert_eq!(signature.arg_types, vec![Type::Int32, Type::Int32]);
    assert_eq!(signature.return_type, Type::Int32);
}

#[test]
fn test_parse_function_body_on_several_lines() {
    let program = parse_ok("fn main(): int32 {\n    var x: int32 = 1\n\n    return x\n}\n");

    match &program.statements[0] {
        Statement::Fn(function) => assert_eq!(function.body.len(), 2),
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_parse_missing_return() {
    let error = parse_err("fn f(): int32 { var x = 1; }");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingReturn {
            function: "f".to_string(),
            return_type: Type::Int32
        }
    );
}

#[test]
fn test_parse_void_function_needs_no_return() {
    let program = parse_ok("fn log(message: string) {\n}\n");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_parse_untyped_argument() {
    let error = parse_err("fn add(a, b) {}");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ExpectedToken {
            expected: TokenKind::Colon,
            received: TokenKind::Comma
        }
    );
}

#[test]
fn test_parse_unterminated_body() {
    let error = parse_err("fn f() {\nvar x = 1\n");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ExpectedToken {
            expected: TokenKind::CloseCurly,
            received: TokenKind::EOF
        }
    );
}

#[test]
fn test_parse_function_redefinition() {
    let error = parse_err("fn a() {}\nfn a() {}");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::FunctionAlreadyDefined {
            function: "a".to_string()
        }
    );
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_parse_function_redefined_inside_its_own_body() {
    let error = parse_err("fn a() {
    fn a() {}
}");

    assert_eq!(error.get_error_name(), "FunctionAlreadyDefined");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().column, 7);
}

#[test]
fn test_parse_forward_reference() {
    let (parser, result) = parse_source("greet(\"a\");\nfn greet(name: string) {\n}\n");
    let program = result.unwrap();

    assert_eq!(
        program.statements[0],
        Statement::Expression(Expression::FnCall(FnCall {
            fn_name: "greet".to_string(),
            params: vec![Expression::StringLiteral(StringLiteral {
                value: "a".to_string()
            })],
        }))
    );
    assert!(parser.get_pending_calls().is_empty());
    assert_eq!(parser.get_function("greet").unwrap().arg_types, vec![Type::String]);
}

#[test]
fn test_parse_forward_reference_called_twice() {
    let program = parse_ok("f(1); f(2)\nfn f(a: int32) {}");
    assert_eq!(program.statements.len(), 3);
}

#[test]
fn test_parse_forward_reference_wrong_type() {
    let error = parse_err("greet(1);\nfn greet(name: string) {}");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ArgumentTypeMismatch {
            index: 0,
            expected: Type::String,
            ..
        }
    ));
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().column, 3);
}

#[test]
fn test_parse_forward_reference_wrong_count() {
    let error = parse_err("greet(1, 2); fn greet(a: int32) {}");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentCountMismatch {
            function: "greet".to_string(),
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn test_parse_forward_references_disagree() {
    let error = parse_err("f(1); f(1, 2);");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentCountMismatch {
            function: "f".to_string(),
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn test_parse_undefined_function() {
    let (parser, result) = parse_source("foo(1);");
    let error = result.unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::FunctionNotDefined {
            function: "foo".to_string()
        }
    );
    assert_eq!(error.get_position().column, 3);
    assert!(parser.get_pending_calls().contains("foo"));
}

#[test]
fn test_parse_recursive_call() {
    let program = parse_ok("fn spin(n: int32) {\n    spin(n - 1)\n}\n");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_parse_declared_call_arity() {
    let add = "fn add(a: int32, b: int32): int32 { return a + b; }\n";

    let error = parse_err(&format!("{}add(1);", add));
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentCountMismatch {
            function: "add".to_string(),
            expected: 2,
            received: 1
        }
    );

    let error = parse_err(&format!("{}add(1, 2, 3);", add));
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentCountMismatch {
            function: "add".to_string(),
            expected: 2,
            received: 3
        }
    );

    let error = parse_err(&format!("{}add(1, \"a\");", add));
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ArgumentTypeMismatch {
            index: 1,
            expected: Type::Int32,
            ..
        }
    ));

    assert_eq!(parse_ok(&format!("{}add(1, 2);", add)).statements.len(), 2);
}

#[test]
fn test_parse_zero_argument_call() {
    let program = parse_ok("fn one(): int32 { return 1; }\nvar x = one()\none()\n");
    assert_eq!(program.statements.len(), 3);

    let error = parse_err("fn one(): int32 { return 1; }\none(2)\n");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ArgumentCountMismatch {
            expected: 0,
            received: 1,
            ..
        }
    ));
}

#[test]
fn test_parse_call_in_typed_context() {
    let error = parse_err("fn one(): int32 { return 1; }\nvar x: int32 = one();");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeVerification {
            source: TypeError::WrongTypeAssignment
        }
    );
}

#[test]
fn test_parse_call_on_variable() {
    let error = parse_err("var x = 1; var y = x(2);");
    assert_eq!(error.get_internal_error(), &ErrorImpl::NotCallable);
}

#[test]
fn test_parse_arguments_are_visible_after_function() {
    // Variables live in a single table shared by every function
    parse_ok("fn f(a: int32) {}\nvar b: int32 = a;");
}

#[test]
fn test_parse_newline_terminators() {
    let program = parse_ok("var x = 1\nvar y = 2\n");
    assert_eq!(program.statements.len(), 2);

    let program = parse_ok("var x = 1;\n\nvar y = 2");
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_parse_missing_terminator() {
    let error = parse_err("var x = 1 var y = 2");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ExpectedEndOfStatement {
            after: "1".to_string()
        }
    );
    assert_eq!(error.get_position().column, 10);
}

#[test]
fn test_parse_unexpected_token() {
    let error = parse_err("+ 1;");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            token: "+".to_string()
        }
    );
}

#[test]
fn test_parse_illegal_token() {
    let error = parse_err("var x = @;");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            token: "@".to_string()
        }
    );

    let error = parse_err("var @ = 1;");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            token: "@".to_string()
        }
    );
}

#[test]
fn test_parse_integer_overflow() {
    let error = parse_err("var x = 99999999999999999999;");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NumberParseError { .. }
    ));
}

#[test]
fn test_parse_integer_above_int32_range() {
    let error = parse_err("fn main(): int32 { return 4294967297; }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NumberParseError {
            token: "4294967297".to_string()
        }
    );
    assert_eq!(error.get_position().column, 26);

    let error = parse_err("var x = 2147483648;");
    assert_eq!(error.get_error_name(), "NumberParseError");

    let (_, result) = parse_source("var x = 2147483647;");
    assert!(result.is_ok());
}

#[test]
fn test_parse_unknown_raw_type() {
    let file = Rc::new("test.lt".to_string());
    let at = |column| Position::new(1, column, Rc::clone(&file));

    let tokens = vec![
        MK_TOKEN!(TokenKind::Var, String::from("var"), at(0)),
        MK_TOKEN!(TokenKind::Identifier, String::from("x"), at(4)),
        MK_TOKEN!(TokenKind::Colon, String::from(":"), at(5)),
        MK_TOKEN!(TokenKind::RawType, String::from("float32"), at(7)),
        MK_TOKEN!(TokenKind::Assignment, String::from("="), at(15)),
        MK_TOKEN!(TokenKind::Float, String::from("1.5"), at(17)),
    ];

    let (_, result) = parse(tokens, Rc::clone(&file));
    let error = result.unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownType {
            type_: "float32".to_string()
        }
    );
    assert_eq!(error.get_position().column, 7);
}

#[test]
fn test_parse_token_stream_without_eof() {
    let file = Rc::new("test.lt".to_string());
    let tokens: Vec<Token> = vec![
        MK_TOKEN!(TokenKind::Var, String::from("var"), Position::new(1, 0, Rc::clone(&file))),
        MK_TOKEN!(TokenKind::Identifier, String::from("x"), Position::new(1, 4, Rc::clone(&file))),
        MK_TOKEN!(TokenKind::Assignment, String::from("="), Position::new(1, 6, Rc::clone(&file))),
        MK_TOKEN!(TokenKind::Integer, String::from("1"), Position::new(1, 8, Rc::clone(&file))),
    ];

    let (_, result) = parse(tokens, file);
    assert_eq!(result.unwrap().statements, vec![var("x", Type::Void, int(1))]);
}
