//! Built-in I/O helpers.
//!
//! `printBool`, `printChar`, `printInt` and `printString` each print their
//! argument on its own line through the C library's `printf`.

use inkwell::{
    module::Linkage,
    types::BasicTypeEnum,
    values::{BasicValueEnum, FunctionValue},
    AddressSpace,
};

use crate::errors::errors::{Error, ErrorImpl};

use super::compiler::Compiler;

/// Declares `printf` and defines the print helpers in the module.
///
/// Must run before any user code is generated; the builder is left without
/// an insertion point.
pub fn register_io_functions(compiler: &Compiler) -> Result<(), Error> {
    let context = compiler.context;
    let i8_ptr_type = context.i8_type().ptr_type(AddressSpace::default());

    let printf = declare_printf(compiler);

    let helpers: [(&str, BasicTypeEnum, &str); 4] = [
        ("printBool", context.bool_type().into(), "%d\n"),
        ("printChar", context.i8_type().into(), "%c\n"),
        ("printInt", context.i32_type().into(), "%d\n"),
        ("printString", i8_ptr_type.into(), "%s\n"),
    ];

    for (name, param_type, format) in helpers {
        define_print_helper(compiler, printf, name, param_type, format)?;
    }

    compiler.builder.clear_insertion_position();
    log::debug!("registered built-in I/O functions");
    Ok(())
}

fn declare_printf<'ctx>(compiler: &Compiler<'ctx>) -> FunctionValue<'ctx> {
    if let Some(printf) = compiler.module.get_function("printf") {
        return printf;
    }

    let i8_ptr_type = compiler.context.i8_type().ptr_type(AddressSpace::default());
    let printf_type = compiler
        .context
        .i32_type()
        .fn_type(&[i8_ptr_type.into()], true);

    compiler
        .module
        .add_function("printf", printf_type, Some(Linkage::External))
}

fn define_print_helper<'ctx>(
    compiler: &Compiler<'ctx>,
    printf: FunctionValue<'ctx>,
    name: &str,
    param_type: BasicTypeEnum<'ctx>,
    format: &str,
) -> Result<(), Error> {
    let context = compiler.context;

    let format_ptr = compiler.add_string_constant(format.as_bytes(), &format!(".{}.format", name));

    let function_type = context.void_type().fn_type(&[param_type.into()], false);
    let function = compiler.create_function(name, function_type, Some(Linkage::External));

    let argument = function.get_nth_param(0).ok_or_else(|| {
        Error::new(
            ErrorImpl::BackendError {
                message: format!("`{}` has no parameter", name),
            },
            crate::Position::null(),
        )
    })?;

    // printf takes small integers as int
    let argument: BasicValueEnum = match argument {
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() == 1 => compiler
            .builder
            .build_int_z_extend(int, context.i32_type(), "value")?
            .into(),
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() < 32 => compiler
            .builder
            .build_int_s_extend(int, context.i32_type(), "value")?
            .into(),
        other => other,
    };

    compiler
        .builder
        .build_call(printf, &[format_ptr.into(), argument.into()], "")?;
    compiler.builder.build_return(None)?;

    Ok(())
}
