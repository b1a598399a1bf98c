use crate::{
    ast::{
        ast::Statement,
        statements::{FnStatement, ReassignVarStatement, ReturnStatement, VarStatement},
    },
    errors::errors::LoweringError,
};

use super::{
    compiler::{describe_type, Compiler, FunctionScope, Storage},
    expr::{gen_expression, gen_value},
};

/// Lowers one statement. `scope` is `None` for top-level statements, whose
/// code goes into the global initializer.
pub fn gen_statement<'a>(
    compiler: &mut Compiler<'a>,
    statement: &Statement,
    mut scope: Option<&mut FunctionScope<'a>>,
) -> Result<(), LoweringError> {
    if scope.is_none() && !matches!(statement, Statement::Fn(_)) {
        compiler.position_at_global_init();
    }

    match statement {
        Statement::Var(var) => gen_var(compiler, var, scope),
        Statement::ReassignVar(reassign) => gen_reassign(compiler, reassign, scope.as_deref()),
        Statement::Fn(function) => gen_function(compiler, function, scope.as_deref_mut()),
        Statement::Return(ret) => gen_return(compiler, ret, scope.as_deref()),
        Statement::Expression(expression) => {
            gen_expression(compiler, expression, scope.as_deref())?;
            Ok(())
        }
    }
}

fn gen_var<'a>(
    compiler: &mut Compiler<'a>,
    var: &VarStatement,
    scope: Option<&mut FunctionScope<'a>>,
) -> Result<(), LoweringError> {
    let value = gen_expression(compiler, &var.value, scope.as_deref())?;

    // Untyped variables take the type of their initializer
    let storage_type = match (compiler.convert_type(var.var_type), value) {
        (Some(declared), _) => declared,
        (None, Some(value)) => value.get_type(),
        (None, None) => compiler.context.i8_type().into(),
    };

    if let Some(value) = value {
        if value.get_type() != storage_type {
            return Err(LoweringError::StorageTypeMismatch {
                name: var.name.clone(),
                expected: describe_type(storage_type),
                received: describe_type(value.get_type()),
            });
        }
    }

    let storage = match scope {
        Some(scope) => {
            let pointer = compiler.builder.build_alloca(storage_type, &var.name)?;
            let storage = Storage {
                pointer,
                value_type: storage_type,
            };
            scope.locals.insert(var.name.clone(), storage);

            storage
        }
        None => compiler.create_global(&var.name, storage_type),
    };

    if let Some(value) = value {
        compiler.builder.build_store(storage.pointer, value)?;
    }

    log::trace!(
        "stored `{}` as {}",
        var.name,
        describe_type(storage.value_type)
    );

    Ok(())
}

fn gen_reassign<'a>(
    compiler: &mut Compiler<'a>,
    reassign: &ReassignVarStatement,
    scope: Option<&FunctionScope<'a>>,
) -> Result<(), LoweringError> {
    let storage = compiler.resolve_storage(&reassign.var_name, scope)?;

    let Some(value) = gen_expression(compiler, &reassign.value, scope)? else {
        log::warn!(
            "`{}` is reassigned to a call without a value, the store is dropped",
            reassign.var_name
        );
        return Ok(());
    };

    if value.get_type() != storage.value_type {
        return Err(LoweringError::StorageTypeMismatch {
            name: reassign.var_name.clone(),
            expected: describe_type(storage.value_type),
            received: describe_type(value.get_type()),
        });
    }

    compiler.builder.build_store(storage.pointer, value)?;

    Ok(())
}

fn gen_return<'a>(
    compiler: &mut Compiler<'a>,
    ret: &ReturnStatement,
    scope: Option<&FunctionScope<'a>>,
) -> Result<(), LoweringError> {
    let Some(scope) = scope else {
        return Err(LoweringError::ReturnOutsideFunction);
    };

    let Some(return_type) = compiler.convert_type(scope.return_type) else {
        // A void function still evaluates the returned expression
        gen_expression(compiler, &ret.value, Some(scope))?;
        compiler.builder.build_return(None)?;
        return Ok(());
    };

    let value = gen_value(compiler, &ret.value, Some(scope))?;
    if value.get_type() != return_type {
        return Err(LoweringError::StorageTypeMismatch {
            name: format!("return value of {}", scope.name),
            expected: describe_type(return_type),
            received: describe_type(value.get_type()),
        });
    }

    compiler.builder.build_return(Some(&value))?;

    Ok(())
}

/// Lowers a function declaration into the function declared by the prepass.
///
/// Arguments are copied into local allocations so they can be reassigned.
pub fn gen_function<'a>(
    compiler: &mut Compiler<'a>,
    function: &FnStatement,
    scope: Option<&mut FunctionScope<'a>>,
) -> Result<(), LoweringError> {
    if let Some(outer) = scope {
        return Err(LoweringError::NestedFunction {
            function: function.name.clone(),
            outer: outer.name.clone(),
        });
    }

    let function_value = match compiler.module.get_function(&function.name) {
        Some(function_value) => function_value,
        None => {
            let fn_type = compiler.convert_fn_type(function.return_type, &function.arg_types());
            compiler.module.add_function(&function.name, fn_type, None)
        }
    };

    log::debug!("lowering function `{}`", function.name);

    compiler.create_basic_block("entry", function_value);

    let mut scope = FunctionScope::new(&function.name, function_value, function.return_type);

    for (arg, param) in function.args.iter().zip(function_value.get_param_iter()) {
        param.set_name(&arg.name);

        let value_type = param.get_type();
        let pointer = compiler.builder.build_alloca(value_type, &arg.name)?;
        compiler.builder.build_store(pointer, param)?;

        scope
            .locals
            .insert(arg.name.clone(), Storage { pointer, value_type });
    }

    for (index, statement) in function.body.iter().enumerate() {
        if compiler.block_terminated() {
            log::warn!(
                "function `{}` has {} unreachable statement(s) after a return",
                function.name,
                function.body.len() - index
            );
            break;
        }

        gen_statement(compiler, statement, Some(&mut scope))?;
    }

    if !compiler.block_terminated() {
        if compiler.convert_type(function.return_type).is_some() {
            return Err(LoweringError::Unsupported(format!(
                "falling off the end of {:?}, which returns {}",
                function.name, function.return_type
            )));
        }

        compiler.builder.build_return(None)?;
    }

    Ok(())
}
