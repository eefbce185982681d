use inkwell::values::{BasicValueEnum, FunctionValue};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{compiler::Compiler, types::ResolvedType};

/// The function whose body is being generated.
#[derive(Debug, Clone, Copy)]
pub struct FunctionContext<'ctx> {
    pub function: FunctionValue<'ctx>,
    pub return_type: ResolvedType<'ctx>,
    /// Value of the most recent `return`.
    pub return_value: Option<BasicValueEnum<'ctx>>,
}

impl<'ctx> FunctionContext<'ctx> {
    pub fn name(&self) -> String {
        self.function.get_name().to_string_lossy().into_owned()
    }
}

impl<'ctx> Compiler<'ctx> {
    /// Makes `function` the active function. Only one may be active at a time.
    pub fn enter_function(
        &mut self,
        function: FunctionValue<'ctx>,
        return_type: ResolvedType<'ctx>,
        position: &Position,
    ) -> Result<(), Error> {
        if self.function.is_some() {
            return Err(Error::new(
                ErrorImpl::NestedFunction {
                    function: function.get_name().to_string_lossy().into_owned(),
                },
                position.clone(),
            ));
        }

        log::debug!(
            "enter function `{}`",
            function.get_name().to_string_lossy()
        );
        self.function = Some(FunctionContext {
            function,
            return_type,
            return_value: None,
        });
        Ok(())
    }

    pub fn leave_function(&mut self) -> Option<FunctionContext<'ctx>> {
        let context = self.function.take();
        if let Some(context) = &context {
            log::debug!("leave function `{}`", context.name());
        }
        context
    }

    /// Runs `f` with `function` active, leaving it again on every exit path.
    pub fn with_function<T>(
        &mut self,
        function: FunctionValue<'ctx>,
        return_type: ResolvedType<'ctx>,
        position: &Position,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.enter_function(function, return_type, position)?;
        let result = f(self);
        self.leave_function();
        result
    }

    pub fn current_return_type(&self) -> Option<ResolvedType<'ctx>> {
        self.function.as_ref().map(|context| context.return_type)
    }

    /// True when the block at the insertion point already ends in a terminator.
    pub fn has_terminator(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }
}
