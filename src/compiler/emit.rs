//! Backend handoff: native object files and in-process execution.

use std::path::Path;

use inkwell::{
    module::Module,
    targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine},
    types::BasicTypeEnum,
    OptimizationLevel,
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::compiler::Compiler;

fn backend_error(message: String) -> Error {
    Error::new(ErrorImpl::BackendError { message }, Position::null())
}

fn initialize_native() -> Result<(), Error> {
    Target::initialize_native(&InitializationConfig::default())
        .map_err(|e| backend_error(format!("failed to initialize native target: {}", e)))
}

/// Writes `module` to `output_path` as a native object file for the host.
pub fn write_object_file(
    module: &Module,
    output_path: &Path,
    opt_level: OptimizationLevel,
) -> Result<(), Error> {
    initialize_native()?;

    let target_triple = TargetMachine::get_default_triple();
    let target = Target::from_triple(&target_triple).map_err(|e| {
        backend_error(format!(
            "failed to get target for triple `{}`: {}",
            target_triple, e
        ))
    })?;

    let target_machine = target
        .create_target_machine(
            &target_triple,
            "generic",
            "",
            opt_level,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| {
            backend_error(format!(
                "failed to create target machine for triple `{}`",
                target_triple
            ))
        })?;

    module.set_triple(&target_triple);
    module.set_data_layout(&target_machine.get_target_data().get_data_layout());

    log::info!("writing object file {}", output_path.display());
    target_machine
        .write_to_file(module, FileType::Object, output_path)
        .map_err(|e| backend_error(format!("failed to write object file: {}", e)))
}

/// JIT-compiles the module and runs its `main`, returning the exit value.
///
/// `main` must take no parameters and return `int`.
pub fn run_main(compiler: &Compiler) -> Result<i32, Error> {
    let main = compiler.main_function.ok_or_else(|| {
        Error::new(
            ErrorImpl::FunctionNotDeclared {
                function: String::from("main"),
            },
            Position::null(),
        )
    })?;

    let returns_int = main
        .get_type()
        .get_return_type()
        .map(|ty| ty == BasicTypeEnum::from(compiler.context.i32_type()))
        .unwrap_or(false);
    if !returns_int || main.count_params() != 0 {
        return Err(backend_error(String::from(
            "`main` must be declared as `int main()` to be run",
        )));
    }

    initialize_native()?;
    let engine = compiler
        .module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|e| backend_error(format!("failed to create execution engine: {}", e)))?;

    let result = unsafe {
        let main = engine
            .get_function::<unsafe extern "C" fn() -> i32>("main")
            .map_err(|e| backend_error(format!("failed to look up `main`: {}", e)))?;
        main.call()
    };

    log::debug!("`main` returned {}", result);
    Ok(result)
}

/// Maps `main`'s result to a process exit status.
///
/// Statuses are a single byte, so results outside `0..=255` saturate
/// instead of wrapping.
pub fn exit_status(result: i32) -> u8 {
    result.clamp(0, u8::MAX as i32) as u8
}
