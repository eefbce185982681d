use inkwell::{
    basic_block::BasicBlock,
    module::Linkage,
    types::{BasicMetadataTypeEnum, BasicTypeEnum},
    values::{BasicValueEnum, PointerValue},
};

use crate::{
    ast::{
        ast::{Stmt, Unit},
        statements::{BlockStmt, ForStmt, FuncDef, IfStmt, ReturnStmt, VarDefStmt},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    cast::{cast_to_bool, expect_type},
    compiler::{global_symbol, Compiler},
    expr::{gen_expression, gen_expression_stmt},
    scope::Variable,
    types::{describe, undef_value, zero_value, ResolvedType},
};

pub fn gen_unit<'ctx>(compiler: &mut Compiler<'ctx>, unit: &Unit) -> Result<(), Error> {
    match unit {
        Unit::Function(func) => gen_function(compiler, func),
        Unit::Variable(var_def) => gen_global(compiler, var_def),
    }
}

pub fn gen_statement<'ctx>(compiler: &mut Compiler<'ctx>, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::Block(block) => gen_block(compiler, block),
        Stmt::VarDef(var_def) => gen_var_def(compiler, var_def),
        Stmt::If(if_stmt) => gen_if(compiler, if_stmt),
        Stmt::For(for_stmt) => gen_for(compiler, for_stmt),
        Stmt::Return(return_stmt) => gen_return(compiler, return_stmt),
        Stmt::Expression(stmt) => gen_expression_stmt(compiler, &stmt.expression),
        Stmt::Empty(_) => Ok(()),
    }
}

/// Generates statements in order, dropping everything after a terminator.
fn gen_statements<'ctx>(compiler: &mut Compiler<'ctx>, statements: &[Stmt]) -> Result<(), Error> {
    for statement in statements.iter() {
        if compiler.has_terminator() {
            log::trace!("skipping unreachable statement");
            break;
        }
        gen_statement(compiler, statement)?;
    }
    Ok(())
}

/// Jumps to `target` unless the current block is already terminated.
fn branch_if_open<'ctx>(
    compiler: &Compiler<'ctx>,
    target: BasicBlock<'ctx>,
) -> Result<(), Error> {
    if !compiler.has_terminator() {
        compiler.builder.build_unconditional_branch(target)?;
    }
    Ok(())
}

/// A nested block opens its own scope and basic block.
fn gen_block<'ctx>(compiler: &mut Compiler<'ctx>, block: &BlockStmt) -> Result<(), Error> {
    let body = compiler.create_basic_block("block")?;
    compiler.builder.build_unconditional_branch(body)?;
    compiler.builder.position_at_end(body);

    compiler.with_scope("block", |compiler| gen_statements(compiler, &block.body))
}

fn gen_var_def<'ctx>(compiler: &mut Compiler<'ctx>, var_def: &VarDefStmt) -> Result<(), Error> {
    let value_type = match compiler.types.resolve(&var_def.var_type) {
        ResolvedType::Basic(ty) => ty,
        ResolvedType::Void => {
            return Err(Error::new(
                ErrorImpl::VoidVariable {
                    variable: var_def
                        .declarators
                        .first()
                        .map(|init| init.name.clone())
                        .unwrap_or_default(),
                },
                var_def.var_type.span.start.clone(),
            ))
        }
    };

    for init in var_def.declarators.iter() {
        let pointer = declare_local(compiler, &init.name, value_type, &init.span.start)?;

        if let Some(value) = &init.value {
            let value_position = value.span.start.clone();
            let value = gen_expression(compiler, value)?;
            expect_type(value_type, value, &value_position)?;
            compiler.builder.build_store(pointer, value)?;
        }
    }

    Ok(())
}

/// Allocates a stack slot for `name` and declares it in the innermost scope.
///
/// The slot is only allocated once the name is known to be free, and is
/// erased again if the declaration still fails.
fn declare_local<'ctx>(
    compiler: &mut Compiler<'ctx>,
    name: &str,
    value_type: BasicTypeEnum<'ctx>,
    position: &Position,
) -> Result<PointerValue<'ctx>, Error> {
    if compiler.scopes.is_declared_innermost(name) {
        return Err(already_declared(name, position));
    }

    let pointer = compiler.create_entry_alloca(value_type, name)?;
    let variable = Variable {
        pointer,
        value_type,
    };

    if !compiler.scopes.declare(name, variable) {
        if let Some(instruction) = pointer.as_instruction() {
            instruction.erase_from_basic_block();
        }
        return Err(already_declared(name, position));
    }

    Ok(pointer)
}

fn already_declared(name: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: String::from(name),
        },
        position.clone(),
    )
}

/// Globals live in the module. Initializers are generated inside the
/// scaffold function and must fold to constants.
fn gen_global<'ctx>(compiler: &mut Compiler<'ctx>, var_def: &VarDefStmt) -> Result<(), Error> {
    let value_type = match compiler.types.resolve(&var_def.var_type) {
        ResolvedType::Basic(ty) => ty,
        ResolvedType::Void => {
            return Err(Error::new(
                ErrorImpl::VoidVariable {
                    variable: var_def
                        .declarators
                        .first()
                        .map(|init| init.name.clone())
                        .unwrap_or_default(),
                },
                var_def.var_type.span.start.clone(),
            ))
        }
    };

    for init in var_def.declarators.iter() {
        let position = &init.span.start;
        if compiler.scopes.is_declared_innermost(&init.name) {
            return Err(already_declared(&init.name, position));
        }

        let initializer = match &init.value {
            Some(value) => {
                let value_position = value.span.start.clone();
                let value = gen_expression(compiler, value)?;
                expect_type(value_type, value, &value_position)?;
                if !is_constant(value) {
                    return Err(Error::new(
                        ErrorImpl::NotImplementedError {
                            feature: String::from("non-constant global initializer"),
                        },
                        value_position,
                    ));
                }
                value
            }
            None => zero_value(value_type),
        };

        let global = compiler
            .module
            .add_global(value_type, None, &global_symbol(&init.name));
        global.set_linkage(Linkage::Internal);
        global.set_initializer(&initializer);

        let variable = Variable {
            pointer: global.as_pointer_value(),
            value_type,
        };
        if !compiler.scopes.declare(&init.name, variable) {
            unsafe {
                global.delete();
            }
            return Err(already_declared(&init.name, position));
        }
        log::debug!("defined global `{}`", init.name);
    }

    Ok(())
}

fn is_constant(value: BasicValueEnum) -> bool {
    match value {
        BasicValueEnum::IntValue(v) => v.is_const(),
        BasicValueEnum::FloatValue(v) => v.is_const(),
        BasicValueEnum::PointerValue(v) => v.is_const(),
        BasicValueEnum::ArrayValue(v) => v.is_const(),
        BasicValueEnum::StructValue(_) | BasicValueEnum::VectorValue(_) => false,
    }
}

fn gen_if<'ctx>(compiler: &mut Compiler<'ctx>, if_stmt: &IfStmt) -> Result<(), Error> {
    let condition = gen_expression(compiler, &if_stmt.condition)?;
    let condition = cast_to_bool(compiler, condition, &if_stmt.condition.span.start)?;

    let then_block = compiler.create_basic_block("then")?;
    let else_block = compiler.create_basic_block("else")?;
    let merge_block = compiler.create_basic_block("merge")?;

    compiler
        .builder
        .build_conditional_branch(condition, then_block, else_block)?;

    compiler.builder.position_at_end(then_block);
    compiler.with_scope("then", |compiler| {
        gen_statement(compiler, &if_stmt.then_body)
    })?;
    let then_terminated = compiler.has_terminator();
    branch_if_open(compiler, merge_block)?;

    compiler.builder.position_at_end(else_block);
    if let Some(else_body) = &if_stmt.else_body {
        compiler.with_scope("else", |compiler| gen_statement(compiler, else_body))?;
    }
    let else_terminated = compiler.has_terminator();
    branch_if_open(compiler, merge_block)?;

    compiler.builder.position_at_end(merge_block);
    // Both arms left the function, so nothing reaches the merge block
    if then_terminated && else_terminated {
        compiler.builder.build_unreachable()?;
    }

    Ok(())
}

fn gen_for<'ctx>(compiler: &mut Compiler<'ctx>, for_stmt: &ForStmt) -> Result<(), Error> {
    let init_block = compiler.create_basic_block("for.init")?;
    let cond_block = compiler.create_basic_block("for.cond")?;
    let body_block = compiler.create_basic_block("for.body")?;
    let inc_block = compiler.create_basic_block("for.inc")?;
    let end_block = compiler.create_basic_block("for.end")?;

    compiler.builder.build_unconditional_branch(init_block)?;
    compiler.builder.position_at_end(init_block);

    // The init scope spans the whole loop and closes at `for.end`
    compiler.with_scope("for", |compiler| {
        if let Some(init) = &for_stmt.init {
            gen_statement(compiler, init)?;
        }
        branch_if_open(compiler, cond_block)?;

        compiler.builder.position_at_end(cond_block);
        match &for_stmt.condition {
            Some(condition) => {
                let value = gen_expression(compiler, condition)?;
                let value = cast_to_bool(compiler, value, &condition.span.start)?;
                compiler
                    .builder
                    .build_conditional_branch(value, body_block, end_block)?;
            }
            None => {
                compiler.builder.build_unconditional_branch(body_block)?;
            }
        }

        compiler.builder.position_at_end(body_block);
        compiler.with_scope("for.body", |compiler| {
            gen_statement(compiler, &for_stmt.body)
        })?;
        branch_if_open(compiler, inc_block)?;

        compiler.builder.position_at_end(inc_block);
        if let Some(increment) = &for_stmt.increment {
            gen_expression_stmt(compiler, increment)?;
        }
        compiler.builder.build_unconditional_branch(cond_block)?;

        compiler.builder.position_at_end(end_block);
        // Without a condition the loop never exits
        if for_stmt.condition.is_none() {
            compiler.builder.build_unreachable()?;
        }

        Ok(())
    })
}

fn gen_return<'ctx>(compiler: &mut Compiler<'ctx>, return_stmt: &ReturnStmt) -> Result<(), Error> {
    let position = &return_stmt.span.start;
    let context = match &compiler.function {
        Some(context) => *context,
        None => {
            return Err(Error::new(
                ErrorImpl::ReturnOutsideFunction,
                position.clone(),
            ))
        }
    };

    let value = match (&return_stmt.value, context.return_type) {
        (None, ResolvedType::Void) => {
            compiler.builder.build_return(None)?;
            return Ok(());
        }
        (None, ResolvedType::Basic(_)) => {
            return Err(Error::new(
                ErrorImpl::MissingReturnValue {
                    function: context.name(),
                },
                position.clone(),
            ))
        }
        (Some(value), ResolvedType::Void) => {
            let received = gen_expression(compiler, value)?;
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: String::from("void"),
                    received: describe(received.get_type()),
                },
                value.span.start.clone(),
            ));
        }
        (Some(value), ResolvedType::Basic(return_type)) => {
            let value_position = value.span.start.clone();
            let value = gen_expression(compiler, value)?;
            expect_type(return_type, value, &value_position)?;
            value
        }
    };

    compiler.builder.build_return(Some(&value))?;
    if let Some(context) = compiler.function.as_mut() {
        context.return_value = Some(value);
    }

    Ok(())
}

/// Generates a function definition.
///
/// Parameters are copied into stack slots so they can be assigned like
/// locals. A body that can fall off its end gets an implicit `ret void`, or
/// `ret undef` for non-void functions. A function whose body fails to
/// generate is removed from the module again.
pub fn gen_function<'ctx>(compiler: &mut Compiler<'ctx>, func: &FuncDef) -> Result<(), Error> {
    let position = &func.span.start;

    if compiler.module.get_function(&func.name).is_some() {
        return Err(Error::new(
            ErrorImpl::FunctionAlreadyDeclared {
                function: func.name.clone(),
            },
            position.clone(),
        ));
    }

    let return_type = compiler.types.resolve(&func.return_type);

    let mut param_types = vec![];
    for param in func.parameters.iter() {
        match compiler.types.resolve(&param.param_type) {
            ResolvedType::Basic(ty) => param_types.push(ty),
            ResolvedType::Void => {
                return Err(Error::new(
                    ErrorImpl::VoidVariable {
                        variable: param.name.clone(),
                    },
                    param.span.start.clone(),
                ))
            }
        }
    }

    let metadata_types: Vec<BasicMetadataTypeEnum<'ctx>> =
        param_types.iter().map(|ty| (*ty).into()).collect();
    let function_type = return_type.fn_type(compiler.context, &metadata_types, false);

    let previous_block = compiler.builder.get_insert_block();
    let function = compiler.create_function(&func.name, function_type, None);

    let generated = compiler.with_function(function, return_type, position, |compiler| {
        compiler.with_scope("function", |compiler| {
            for (index, (param, value_type)) in
                func.parameters.iter().zip(param_types.iter()).enumerate()
            {
                let incoming = function.get_nth_param(index as u32).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::BackendError {
                            message: format!("missing parameter {} of `{}`", index, func.name),
                        },
                        param.span.start.clone(),
                    )
                })?;
                incoming.set_name(&param.name);

                let pointer =
                    declare_local(compiler, &param.name, *value_type, &param.span.start)?;
                compiler.builder.build_store(pointer, incoming)?;
            }

            gen_statements(compiler, &func.body.body)?;

            if !compiler.has_terminator() {
                match compiler.current_return_type().unwrap_or(return_type) {
                    ResolvedType::Void => {
                        compiler.builder.build_return(None)?;
                    }
                    ResolvedType::Basic(ty) => {
                        let returns_elsewhere = compiler
                            .function
                            .map(|context| context.return_value.is_some())
                            .unwrap_or(false);
                        if returns_elsewhere {
                            log::warn!(
                                "function `{}` can reach its end without returning a value",
                                func.name
                            );
                        } else {
                            log::warn!("function `{}` never returns a value", func.name);
                        }
                        compiler.builder.build_return(Some(&undef_value(ty)))?;
                    }
                }
            }

            Ok(())
        })
    });

    match previous_block {
        Some(block) => compiler.builder.position_at_end(block),
        None => compiler.builder.clear_insertion_position(),
    }

    if let Err(error) = generated {
        unsafe {
            function.delete();
        }
        return Err(error);
    }

    if func.name == "main" {
        compiler.main_function = Some(function);
    }

    log::debug!("generated function `{}`", func.name);
    Ok(())
}
