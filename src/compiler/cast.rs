use inkwell::{
    types::BasicTypeEnum,
    values::{BasicValueEnum, IntValue},
    IntPredicate,
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{compiler::Compiler, types::describe};

/// Coerces a condition to `i1`: booleans pass through, other integers
/// compare not-equal to zero.
pub fn cast_to_bool<'ctx>(
    compiler: &Compiler<'ctx>,
    value: BasicValueEnum<'ctx>,
    position: &Position,
) -> Result<IntValue<'ctx>, Error> {
    match value {
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() == 1 => Ok(int),
        BasicValueEnum::IntValue(int) => Ok(compiler.builder.build_int_compare(
            IntPredicate::NE,
            int,
            int.get_type().const_zero(),
            "tobool",
        )?),
        other => Err(Error::new(
            ErrorImpl::CannotCastToBool {
                type_: describe(other.get_type()),
            },
            position.clone(),
        )),
    }
}

/// Fails with `TypeMatchError` unless `value` has exactly the `expected` type.
pub fn expect_type<'ctx>(
    expected: BasicTypeEnum<'ctx>,
    value: BasicValueEnum<'ctx>,
    position: &Position,
) -> Result<(), Error> {
    let received = value.get_type();
    if received == expected {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::TypeMatchError {
            expected: describe(expected),
            received: describe(received),
        },
        position.clone(),
    ))
}
