use crate::{
    ast::{
        ast::{Expression, Operator},
        expressions::{
            FloatLiteral, FnCall, Identifier, InfixExpression, IntegerLiteral, PrefixExpression,
            StringLiteral, UnboundedIdentifier,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, resolver::CallSite};

/// Parses an expression and verifies it against `expected_type`.
///
/// Verification errors are reported at the position where the expression
/// starts.
pub fn parse_expr(
    parser: &mut Parser,
    bp: BindingPower,
    expected_type: Type,
) -> Result<Expression, Error> {
    let start = parser.get_position();

    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud_fn(parser, expected_type)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(next_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        left = led_fn(parser, left, next_bp, expected_type)?;
    }

    expected_type
        .verify(&left)
        .map_err(|error| Error::new(error.into(), start))?;

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser, _expected_type: Type) -> Result<Expression, Error> {
    match parser.current_token_kind() {
        TokenKind::Integer => {
            let token = parser.advance();
            let value = token.value.parse::<i32>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.position.clone(),
                )
            })?;

            Ok(Expression::IntegerLiteral(IntegerLiteral { value }))
        }
        TokenKind::Float => {
            let token = parser.advance();
            let value = token.value.parse().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.position.clone(),
                )
            })?;

            Ok(Expression::FloatLiteral(FloatLiteral { value }))
        }
        TokenKind::String => Ok(Expression::StringLiteral(StringLiteral {
            value: parser.advance().value,
        })),
        TokenKind::Identifier => {
            let token = parser.advance();

            if let Some(var_type) = parser.get_variable(&token.value) {
                return Ok(Expression::Identifier(Identifier {
                    value: token.value,
                    var_type,
                }));
            }

            // Unknown names are only allowed as callees
            if parser.current_token_kind() == TokenKind::OpenParen {
                return Ok(Expression::UnboundedIdentifier(UnboundedIdentifier {
                    value: token.value,
                }));
            }

            Err(Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: token.value,
                },
                token.position,
            ))
        }
        _ => Err(parser.unexpected()),
    }
}

pub fn parse_infix_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
    expected_type: Type,
) -> Result<Expression, Error> {
    let operator_token = parser.advance();
    let Some(operator) = Operator::from_token_kind(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.position,
        ));
    };

    let right = parse_expr(parser, bp, expected_type)?;

    Ok(Expression::Infix(InfixExpression::new(left, operator, right)))
}

pub fn parse_prefix_expr(parser: &mut Parser, expected_type: Type) -> Result<Expression, Error> {
    let operator_token = parser.advance();
    let Some(operator) = Operator::from_token_kind(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.position,
        ));
    };

    let right = parse_expr(parser, BindingPower::Unary, expected_type)?;

    Ok(Expression::Prefix(PrefixExpression::new(operator, right)))
}

pub fn parse_grouping_expr(parser: &mut Parser, expected_type: Type) -> Result<Expression, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default, expected_type)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses the argument list of a call. The callee has already been parsed
/// as `left` and the current token is `(`.
///
/// Calls to declared functions check each argument against the declared
/// argument type. Calls to undeclared functions are recorded and checked
/// once the declaration shows up.
pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expression,
    _bp: BindingPower,
    _expected_type: Type,
) -> Result<Expression, Error> {
    let open_paren = parser.advance();

    let fn_name = match left {
        Expression::UnboundedIdentifier(UnboundedIdentifier { value }) => value,
        _ => return Err(Error::new(ErrorImpl::NotCallable, open_paren.position)),
    };

    if let Some(signature) = parser.get_function(&fn_name) {
        let arg_types = signature.arg_types.clone();
        let params = parse_declared_call_args(parser, &fn_name, &arg_types)?;

        return Ok(Expression::FnCall(FnCall { fn_name, params }));
    }

    let params = parse_call_args(parser)?;
    parser.record_pending_call(
        &fn_name,
        CallSite {
            position: open_paren.position,
            arguments: params.clone(),
        },
    )?;

    Ok(Expression::FnCall(FnCall { fn_name, params }))
}

/// Parses `arg, arg, ...)` without any type expectation.
fn parse_call_args(parser: &mut Parser) -> Result<Vec<Expression>, Error> {
    let mut params = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_expr(parser, BindingPower::Default, Type::Void)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }

            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(params)
}

fn parse_declared_call_args(
    parser: &mut Parser,
    fn_name: &str,
    arg_types: &[Type],
) -> Result<Vec<Expression>, Error> {
    let count_mismatch = |received: usize, parser: &Parser| {
        Error::new(
            ErrorImpl::ArgumentCountMismatch {
                function: fn_name.to_string(),
                expected: arg_types.len(),
                received,
            },
            parser.get_position(),
        )
    };

    let mut params = vec![];

    for (index, arg_type) in arg_types.iter().enumerate() {
        if parser.current_token_kind() == TokenKind::CloseParen {
            return Err(count_mismatch(index, parser));
        }

        if index > 0 {
            parser.expect(TokenKind::Comma)?;
        }

        let arg = parse_expr(parser, BindingPower::Default, *arg_type).map_err(|error| {
            match error.get_internal_error() {
                ErrorImpl::TypeVerification { source } => Error::new(
                    ErrorImpl::ArgumentTypeMismatch {
                        function: fn_name.to_string(),
                        index,
                        expected: *arg_type,
                        source: source.clone(),
                    },
                    error.get_position().clone(),
                ),
                _ => error,
            }
        })?;

        params.push(arg);
    }

    if parser.current_token_kind() != TokenKind::CloseParen {
        if !arg_types.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        // Count what is left to report the real number of arguments
        let extra = parse_call_args(parser)?;
        return Err(count_mismatch(arg_types.len() + extra.len(), parser));
    }

    parser.advance();

    Ok(params)
}
