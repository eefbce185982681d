use inkwell::{
    types::BasicTypeEnum,
    values::{BasicMetadataValueEnum, BasicValueEnum, FloatValue, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::expressions::{BinaryOperator, Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{cast::expect_type, compiler::Compiler, scope::Variable, types::describe};

/// Generates an expression as an rvalue.
///
/// Calls to void functions have no value here; use [`gen_expression_stmt`]
/// where the result is discarded.
pub fn gen_expression<'ctx>(
    compiler: &mut Compiler<'ctx>,
    expression: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    match gen_expression_value(compiler, expression)? {
        Some(value) => Ok(value),
        None => Err(Error::new(
            ErrorImpl::VoidValue {
                function: match &expression.kind {
                    ExprKind::Call { callee, .. } => callee.clone(),
                    _ => String::new(),
                },
            },
            expression.span.start.clone(),
        )),
    }
}

/// Generates an expression for its side effects only.
pub fn gen_expression_stmt<'ctx>(
    compiler: &mut Compiler<'ctx>,
    expression: &Expr,
) -> Result<(), Error> {
    gen_expression_value(compiler, expression)?;
    Ok(())
}

/// Resolves an assignable expression to its storage. Only named variables
/// are assignable.
pub fn gen_address<'ctx>(
    compiler: &mut Compiler<'ctx>,
    expression: &Expr,
) -> Result<Variable<'ctx>, Error> {
    match &expression.kind {
        ExprKind::Symbol(name) => compiler.scopes.lookup(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: name.clone(),
                },
                expression.span.start.clone(),
            )
        }),
        _ => Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            expression.span.start.clone(),
        )),
    }
}

fn gen_expression_value<'ctx>(
    compiler: &mut Compiler<'ctx>,
    expression: &Expr,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let position = &expression.span.start;

    let value: BasicValueEnum<'ctx> = match &expression.kind {
        ExprKind::Bool(value) => compiler
            .context
            .bool_type()
            .const_int(*value as u64, false)
            .into(),
        ExprKind::Char(value) => compiler
            .context
            .i8_type()
            .const_int(*value as u64, false)
            .into(),
        ExprKind::Int(value) => compiler
            .context
            .i32_type()
            .const_int(*value as u64, true)
            .into(),
        ExprKind::Double(value) => compiler.context.f64_type().const_float(*value).into(),
        ExprKind::String(bytes) => compiler.add_string_constant(bytes, ".str").into(),
        ExprKind::Symbol(name) => {
            let variable = gen_address(compiler, expression)?;
            compiler.builder.build_load(variable.pointer, name)?
        }
        ExprKind::Negate(operand) => gen_negate(compiler, operand)?,
        ExprKind::Binary {
            operator,
            left,
            right,
        } => gen_binary(compiler, *operator, left, right, position)?,
        ExprKind::Assignment { assignee, value } => gen_assignment(compiler, assignee, value)?,
        ExprKind::Call { callee, arguments } => {
            return gen_call(compiler, callee, arguments, position)
        }
    };

    Ok(Some(value))
}

/// Stores the value, then reads it back so the assignment itself has a value.
fn gen_assignment<'ctx>(
    compiler: &mut Compiler<'ctx>,
    assignee: &Expr,
    value: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let variable = gen_address(compiler, assignee)?;
    let stored = gen_expression(compiler, value)?;
    expect_type(variable.value_type, stored, &value.span.start)?;

    compiler.builder.build_store(variable.pointer, stored)?;
    Ok(compiler.builder.build_load(variable.pointer, "assign")?)
}

fn gen_negate<'ctx>(
    compiler: &mut Compiler<'ctx>,
    operand: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let value = gen_expression(compiler, operand)?;

    match value {
        BasicValueEnum::IntValue(int) if !is_bool(int) => {
            Ok(compiler.builder.build_int_neg(int, "neg")?.into())
        }
        BasicValueEnum::FloatValue(float) => {
            Ok(compiler.builder.build_float_neg(float, "neg")?.into())
        }
        other => Err(unsupported_operands("-", other.get_type(), &operand.span.start)),
    }
}

fn gen_binary<'ctx>(
    compiler: &mut Compiler<'ctx>,
    operator: BinaryOperator,
    left: &Expr,
    right: &Expr,
    position: &Position,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let lhs = gen_expression(compiler, left)?;
    let rhs = gen_expression(compiler, right)?;

    if lhs.get_type() != rhs.get_type() {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: describe(lhs.get_type()),
                received: describe(rhs.get_type()),
            },
            right.span.start.clone(),
        ));
    }

    match (lhs, rhs) {
        (BasicValueEnum::IntValue(lhs), BasicValueEnum::IntValue(rhs)) => {
            // Booleans only support equality
            if is_bool(lhs) && !matches!(operator, BinaryOperator::Equals | BinaryOperator::NotEquals) {
                return Err(Error::new(
                    ErrorImpl::InvalidOperands {
                        operator: operator.to_string(),
                        type_: String::from("bool"),
                    },
                    position.clone(),
                ));
            }
            gen_int_binary(compiler, operator, lhs, rhs)
        }
        (BasicValueEnum::FloatValue(lhs), BasicValueEnum::FloatValue(rhs)) => {
            gen_float_binary(compiler, operator, lhs, rhs)
        }
        (other, _) => Err(unsupported_operands(
            &operator.to_string(),
            other.get_type(),
            position,
        )),
    }
}

fn gen_int_binary<'ctx>(
    compiler: &Compiler<'ctx>,
    operator: BinaryOperator,
    lhs: IntValue<'ctx>,
    rhs: IntValue<'ctx>,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let builder = &compiler.builder;

    let value = match operator {
        BinaryOperator::Add => builder.build_int_add(lhs, rhs, "add")?,
        BinaryOperator::Sub => builder.build_int_sub(lhs, rhs, "sub")?,
        BinaryOperator::Mul => builder.build_int_mul(lhs, rhs, "mul")?,
        BinaryOperator::Div => builder.build_int_signed_div(lhs, rhs, "div")?,
        BinaryOperator::Rem => builder.build_int_signed_rem(lhs, rhs, "rem")?,
        BinaryOperator::Equals => builder.build_int_compare(IntPredicate::EQ, lhs, rhs, "eq")?,
        BinaryOperator::NotEquals => {
            builder.build_int_compare(IntPredicate::NE, lhs, rhs, "ne")?
        }
        BinaryOperator::Less => builder.build_int_compare(IntPredicate::SLT, lhs, rhs, "lt")?,
        BinaryOperator::LessEquals => {
            builder.build_int_compare(IntPredicate::SLE, lhs, rhs, "le")?
        }
        BinaryOperator::Greater => builder.build_int_compare(IntPredicate::SGT, lhs, rhs, "gt")?,
        BinaryOperator::GreaterEquals => {
            builder.build_int_compare(IntPredicate::SGE, lhs, rhs, "ge")?
        }
    };

    Ok(value.into())
}

fn gen_float_binary<'ctx>(
    compiler: &Compiler<'ctx>,
    operator: BinaryOperator,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let builder = &compiler.builder;

    let predicate = match operator {
        BinaryOperator::Add => return Ok(builder.build_float_add(lhs, rhs, "fadd")?.into()),
        BinaryOperator::Sub => return Ok(builder.build_float_sub(lhs, rhs, "fsub")?.into()),
        BinaryOperator::Mul => return Ok(builder.build_float_mul(lhs, rhs, "fmul")?.into()),
        BinaryOperator::Div => return Ok(builder.build_float_div(lhs, rhs, "fdiv")?.into()),
        BinaryOperator::Rem => return Ok(builder.build_float_rem(lhs, rhs, "frem")?.into()),
        BinaryOperator::Equals => FloatPredicate::OEQ,
        BinaryOperator::NotEquals => FloatPredicate::ONE,
        BinaryOperator::Less => FloatPredicate::OLT,
        BinaryOperator::LessEquals => FloatPredicate::OLE,
        BinaryOperator::Greater => FloatPredicate::OGT,
        BinaryOperator::GreaterEquals => FloatPredicate::OGE,
    };

    Ok(builder
        .build_float_compare(predicate, lhs, rhs, "fcmp")?
        .into())
}

fn is_bool(value: IntValue) -> bool {
    value.get_type().get_bit_width() == 1
}

/// Pointers and arrays have no arithmetic yet; anything else is invalid.
fn unsupported_operands(operator: &str, ty: BasicTypeEnum, position: &Position) -> Error {
    let error = match ty {
        BasicTypeEnum::PointerType(_) | BasicTypeEnum::ArrayType(_) => {
            ErrorImpl::NotImplementedError {
                feature: format!("`{}` on `{}` operands", operator, describe(ty)),
            }
        }
        _ => ErrorImpl::InvalidOperands {
            operator: String::from(operator),
            type_: describe(ty),
        },
    };

    Error::new(error, position.clone())
}

/// Calls a function from the module's function table.
///
/// The callee is resolved before any argument is generated. Arguments must
/// match the parameter types exactly; extra arguments to variadic functions
/// get the C default promotions.
fn gen_call<'ctx>(
    compiler: &mut Compiler<'ctx>,
    callee: &str,
    arguments: &[Expr],
    position: &Position,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let function = compiler.module.get_function(callee).ok_or_else(|| {
        Error::new(
            ErrorImpl::FunctionNotDeclared {
                function: String::from(callee),
            },
            position.clone(),
        )
    })?;

    let param_count = function.count_params() as usize;
    let is_var_arg = function.get_type().is_var_arg();

    if arguments.len() < param_count {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                expected: param_count,
                received: arguments.len(),
            },
            position.clone(),
        ));
    }
    if arguments.len() > param_count && !is_var_arg {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                expected: param_count,
                received: arguments.len(),
            },
            position.clone(),
        ));
    }

    let mut values: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(arguments.len());
    for (index, argument) in arguments.iter().enumerate() {
        let value = gen_expression(compiler, argument)?;

        let value = match function.get_nth_param(index as u32) {
            Some(param) => {
                let expected = param.get_type();
                if value.get_type() != expected {
                    return Err(Error::new(
                        ErrorImpl::ArgumentTypeMatchError {
                            expected: describe(expected),
                            received: describe(value.get_type()),
                        },
                        argument.span.start.clone(),
                    ));
                }
                value
            }
            None => promote_variadic(compiler, value)?,
        };

        values.push(value.into());
    }

    let returns_value = function.get_type().get_return_type().is_some();
    let call = compiler
        .builder
        .build_call(function, &values, if returns_value { "call" } else { "" })?;

    Ok(call.try_as_basic_value().left())
}

/// Small integers widen to `int` and floats to `double` when passed through `...`.
fn promote_variadic<'ctx>(
    compiler: &Compiler<'ctx>,
    value: BasicValueEnum<'ctx>,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let i32_type = compiler.context.i32_type();

    match value {
        BasicValueEnum::IntValue(int) if is_bool(int) => Ok(compiler
            .builder
            .build_int_z_extend(int, i32_type, "promote")?
            .into()),
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() < 32 => Ok(compiler
            .builder
            .build_int_s_extend(int, i32_type, "promote")?
            .into()),
        BasicValueEnum::FloatValue(float) if float.get_type() != compiler.context.f64_type() => {
            Ok(compiler
                .builder
                .build_float_ext(float, compiler.context.f64_type(), "promote")?
                .into())
        }
        other => Ok(other),
    }
}
