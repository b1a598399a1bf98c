use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum};

use crate::{
    ast::{
        ast::{Expression, Operator},
        expressions::{FnCall, InfixExpression, PrefixExpression},
    },
    errors::errors::LoweringError,
};

use super::compiler::{describe_type, Compiler, FunctionScope};

/// Generates LLVM IR for the given expression.
///
/// Returns `None` only for calls to functions that return nothing.
pub fn gen_expression<'a>(
    compiler: &Compiler<'a>,
    expression: &Expression,
    scope: Option<&FunctionScope<'a>>,
) -> Result<Option<BasicValueEnum<'a>>, LoweringError> {
    let value = match expression {
        Expression::IntegerLiteral(literal) => compiler
            .context
            .i32_type()
            .const_int(literal.value as u64, true)
            .into(),
        Expression::FloatLiteral(literal) => compiler
            .context
            .f32_type()
            .const_float(literal.value)
            .into(),
        Expression::StringLiteral(literal) => {
            let data = compiler
                .builder
                .build_global_string_ptr(&literal.value, "str")?
                .as_pointer_value();
            let len = compiler
                .context
                .i32_type()
                .const_int(literal.value.len() as u64, false);

            compiler
                .string_type()
                .const_named_struct(&[len.into(), data.into()])
                .into()
        }
        Expression::Identifier(identifier) => {
            let storage = compiler.resolve_storage(&identifier.value, scope)?;
            compiler
                .builder
                .build_load(storage.pointer, &identifier.value)?
        }
        Expression::Infix(infix) => gen_infix(compiler, infix, scope)?,
        Expression::Prefix(prefix) => gen_prefix(compiler, prefix, scope)?,
        Expression::FnCall(call) => return gen_call(compiler, call, scope),
        Expression::UnboundedIdentifier(identifier) => unreachable!(
            "unbound identifier {:?} outside of a call reached lowering",
            identifier.value
        ),
    };

    Ok(Some(value))
}

/// Like `gen_expression`, for places where a value is required.
pub fn gen_value<'a>(
    compiler: &Compiler<'a>,
    expression: &Expression,
    scope: Option<&FunctionScope<'a>>,
) -> Result<BasicValueEnum<'a>, LoweringError> {
    gen_expression(compiler, expression, scope)?.ok_or_else(|| match expression {
        Expression::FnCall(call) => LoweringError::VoidValue {
            function: call.fn_name.clone(),
        },
        other => unreachable!("{} produced no value", other.get_expr_name()),
    })
}

fn gen_infix<'a>(
    compiler: &Compiler<'a>,
    infix: &InfixExpression,
    scope: Option<&FunctionScope<'a>>,
) -> Result<BasicValueEnum<'a>, LoweringError> {
    let left = gen_value(compiler, &infix.left, scope)?;
    let right = gen_value(compiler, &infix.right, scope)?;

    let builder = &compiler.builder;

    match (left, right) {
        (BasicValueEnum::IntValue(left), BasicValueEnum::IntValue(right)) => {
            let value = match infix.operator {
                Operator::Plus => builder.build_int_add(left, right, "add")?,
                Operator::Minus => builder.build_int_sub(left, right, "sub")?,
                Operator::Multiply => builder.build_int_mul(left, right, "mul")?,
                Operator::Divide => builder.build_int_signed_div(left, right, "div")?,
                operator => unreachable!("infix operator {} reached lowering", operator),
            };

            Ok(value.into())
        }
        (BasicValueEnum::FloatValue(left), BasicValueEnum::FloatValue(right)) => {
            let value = match infix.operator {
                Operator::Plus => builder.build_float_add(left, right, "fadd")?,
                Operator::Minus => builder.build_float_sub(left, right, "fsub")?,
                Operator::Multiply => builder.build_float_mul(left, right, "fmul")?,
                Operator::Divide => builder.build_float_div(left, right, "fdiv")?,
                operator => unreachable!("infix operator {} reached lowering", operator),
            };

            Ok(value.into())
        }
        (BasicValueEnum::StructValue(_), BasicValueEnum::StructValue(_)) => Err(
            LoweringError::Unsupported(format!("string operator {}", infix.operator)),
        ),
        (left, right) => Err(LoweringError::MismatchedOperands {
            operator: infix.operator.to_string(),
            left: describe_type(left.get_type()),
            right: describe_type(right.get_type()),
        }),
    }
}

fn gen_prefix<'a>(
    compiler: &Compiler<'a>,
    prefix: &PrefixExpression,
    scope: Option<&FunctionScope<'a>>,
) -> Result<BasicValueEnum<'a>, LoweringError> {
    if prefix.operator != Operator::Minus {
        unreachable!("prefix operator {} reached lowering", prefix.operator);
    }

    match gen_value(compiler, &prefix.right, scope)? {
        BasicValueEnum::IntValue(value) => Ok(compiler.builder.build_int_neg(value, "neg")?.into()),
        BasicValueEnum::FloatValue(value) => {
            Ok(compiler.builder.build_float_neg(value, "fneg")?.into())
        }
        other => Err(LoweringError::Unsupported(format!(
            "negating a value of type {}",
            describe_type(other.get_type())
        ))),
    }
}

fn gen_call<'a>(
    compiler: &Compiler<'a>,
    call: &FnCall,
    scope: Option<&FunctionScope<'a>>,
) -> Result<Option<BasicValueEnum<'a>>, LoweringError> {
    let function = compiler
        .module
        .get_function(&call.fn_name)
        .ok_or_else(|| LoweringError::UnknownFunction {
            function: call.fn_name.clone(),
        })?;

    let args = call
        .params
        .iter()
        .map(|param| gen_value(compiler, param, scope).map(BasicMetadataValueEnum::from))
        .collect::<Result<Vec<_>, _>>()?;

    // Values of type void cannot be named
    let name = if function.get_type().get_return_type().is_some() {
        "call"
    } else {
        ""
    };

    Ok(compiler
        .builder
        .build_call(function, &args, name)?
        .try_as_basic_value()
        .left())
}
