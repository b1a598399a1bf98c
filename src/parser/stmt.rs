use crate::{
    ast::{
        ast::{Expression, Statement},
        expressions::UnboundedIdentifier,
        statements::{Argument, FnStatement, ReassignVarStatement, ReturnStatement, VarStatement},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_call_expr, parse_expr},
    lookups::BindingPower,
    parser::Parser,
    resolver::FnSignature,
    types::{parse_raw_type, parse_type_annotation},
};

/// Parses one statement.
///
/// `return_type` is the return type of the enclosing function, `Void` at the
/// top level.
pub fn parse_stmt(parser: &mut Parser, return_type: Type) -> Result<Statement, Error> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser, return_type);
    }

    if parser.current_token_kind() == TokenKind::Identifier {
        let name = parser.current_token().value.clone();

        if let Some(var_type) = parser.get_variable(&name) {
            return parse_reassign_stmt(parser, var_type);
        }

        match parser.peek_token_kind() {
            TokenKind::OpenParen => return parse_call_stmt(parser),
            TokenKind::Assignment => {
                return Err(Error::new(
                    ErrorImpl::VariableNotDeclared { variable: name },
                    parser.get_position(),
                ))
            }
            _ => {}
        }
    }

    Err(parser.unexpected())
}

pub fn parse_var_decl_stmt(parser: &mut Parser, _return_type: Type) -> Result<Statement, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier)?.value;
    let var_type = parse_type_annotation(parser)?.unwrap_or(Type::Void);

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default, var_type)?;
    parser.expect_terminator()?;

    // Bound after the initializer, so `var x = x` is an error
    parser.declare_variable(name.clone(), var_type);

    Ok(Statement::Var(VarStatement {
        name,
        var_type,
        value,
    }))
}

fn parse_reassign_stmt(parser: &mut Parser, var_type: Type) -> Result<Statement, Error> {
    let var_name = parser.advance().value;

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default, var_type)?;
    parser.expect_terminator()?;

    Ok(Statement::ReassignVar(ReassignVarStatement {
        var_name,
        var_type,
        value,
    }))
}

fn parse_call_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let callee = Expression::UnboundedIdentifier(UnboundedIdentifier {
        value: parser.advance().value,
    });

    let call = parse_call_expr(parser, callee, BindingPower::Call, Type::Void)?;
    parser.expect_terminator()?;

    Ok(Statement::Expression(call))
}

pub fn parse_return_stmt(parser: &mut Parser, return_type: Type) -> Result<Statement, Error> {
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default, return_type)?;
    parser.expect_terminator()?;

    Ok(Statement::Return(ReturnStatement { return_type, value }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser, _return_type: Type) -> Result<Statement, Error> {
    parser.advance();

    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = name_token.value.clone();

    if parser.get_function(&name).is_some() {
        return Err(Error::new(
            ErrorImpl::FunctionAlreadyDefined { function: name },
            name_token.position,
        ));
    }

    let args = parse_fn_args(parser)?;

    parser
        .get_pending_calls_mut()
        .reconcile(&name, &args, &name_token.position)?;

    let declared_return = parse_type_annotation(parser)?;
    let return_type = declared_return.unwrap_or(Type::Void);

    parser.declare_function(FnSignature {
        name: name.clone(),
        arg_types: args.iter().map(|arg| arg.arg_type).collect(),
        return_type,
    });

    for arg in &args {
        parser.declare_variable(arg.name.clone(), arg.arg_type);
    }

    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    loop {
        parser.skip_newlines();

        match parser.current_token_kind() {
            TokenKind::CloseCurly | TokenKind::EOF => break,
            _ => body.push(parse_stmt(parser, return_type)?),
        }
    }

    let close_curly = parser.expect(TokenKind::CloseCurly)?;

    // Only functions with a written return type have to end with a return
    if declared_return.is_some() {
        match body.last() {
            Some(Statement::Return(ret)) if ret.return_type == return_type => {}
            Some(Statement::Return(ret)) => {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        function: name,
                        expected: return_type,
                        received: ret.return_type,
                    },
                    close_curly.position,
                ))
            }
            _ => {
                return Err(Error::new(
                    ErrorImpl::MissingReturn {
                        function: name,
                        return_type,
                    },
                    close_curly.position,
                ))
            }
        }
    }

    Ok(Statement::Fn(FnStatement {
        name,
        args,
        return_type,
        body,
    }))
}

/// Parses `(name: type, ...)`. Every argument needs a type.
fn parse_fn_args(parser: &mut Parser) -> Result<Vec<Argument>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(args);
    }

    loop {
        let name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Colon)?;
        let arg_type = parse_raw_type(parser)?;

        args.push(Argument { name, arg_type });

        if parser.current_token_kind() == TokenKind::CloseParen {
            parser.advance();
            return Ok(args);
        }

        parser.expect(TokenKind::Comma)?;
    }
}
