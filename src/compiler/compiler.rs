//! Main compiler module.
//!
//! This module contains the `Compiler` generation context and the module
//! driver. A `Compiler` owns the LLVM module and builder together with the
//! state threaded through every codegen call: the type catalog, the scope
//! stack and the active function.

use std::path::Path;

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    types::{BasicTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
    AddressSpace,
};

use crate::{
    ast::ast::Program,
    config::CodegenOptions,
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    function::FunctionContext,
    io::register_io_functions,
    scope::{ScopeStack, Variable},
    stmt::gen_unit,
    types::TypeCatalog,
};

/// Name of the synthetic function that hosts global initializers while they
/// are generated. It never survives a compilation, and the leading dot keeps
/// it out of the identifier space.
pub const GLOBALS_SCAFFOLD: &str = ".minic.globals";

/// LLVM symbol name of a user global. Functions and globals share the module
/// symbol table, so globals are moved out of the identifier space.
pub fn global_symbol(name: &str) -> String {
    format!(".global.{}", name)
}

/// The generation context for one compilation.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,

    /// Resolved type cache
    pub types: TypeCatalog<'ctx>,
    /// Lexical scopes, the global scope at the bottom
    pub scopes: ScopeStack<Variable<'ctx>>,
    /// The function currently being generated
    pub function: Option<FunctionContext<'ctx>>,
    /// The program's entry point, once `main` has been generated
    pub main_function: Option<FunctionValue<'ctx>>,
}

impl<'ctx> Compiler<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Compiler {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            types: TypeCatalog::new(context),
            scopes: ScopeStack::new(),
            function: None,
            main_function: None,
        }
    }

    /// Saves the current LLVM module to a file as textual IR.
    pub fn save_module_to_file(&self, output_file: &Path) -> Result<(), Error> {
        self.module.print_to_file(output_file).map_err(|message| {
            Error::new(
                ErrorImpl::BackendError {
                    message: message.to_string(),
                },
                Position::null(),
            )
        })
    }

    pub fn print_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Runs the LLVM module verifier.
    pub fn verify(&self) -> Result<(), Error> {
        self.module.verify().map_err(|message| {
            Error::new(
                ErrorImpl::VerificationError {
                    message: message.to_string(),
                },
                Position::null(),
            )
        })
    }

    /// Adds a function with an entry block and positions the builder there.
    pub fn create_function(
        &self,
        name: &str,
        function_type: FunctionType<'ctx>,
        linkage: Option<Linkage>,
    ) -> FunctionValue<'ctx> {
        let function = self.module.add_function(name, function_type, linkage);
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        function
    }

    /// Adds a private constant holding `bytes` and a terminating NUL, and
    /// returns its address as an `i8*`.
    pub fn add_string_constant(&self, bytes: &[u8], name: &str) -> PointerValue<'ctx> {
        let value = self.context.const_string(bytes, true);
        let global = self.module.add_global(value.get_type(), None, name);
        global.set_initializer(&value);
        global.set_constant(true);
        global.set_linkage(Linkage::Private);

        global
            .as_pointer_value()
            .const_cast(self.context.i8_type().ptr_type(AddressSpace::default()))
    }

    /// Function owning the block at the insertion point.
    pub fn insertion_function(&self) -> Result<FunctionValue<'ctx>, Error> {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_parent())
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::BackendError {
                        message: String::from("builder has no insertion point"),
                    },
                    Position::null(),
                )
            })
    }

    /// Appends a new basic block to the function at the insertion point.
    pub fn create_basic_block(&self, name: &str) -> Result<BasicBlock<'ctx>, Error> {
        let function = self.insertion_function()?;
        log::trace!("create block `{}`", name);
        Ok(self.context.append_basic_block(function, name))
    }

    /// Allocates stack storage at the top of the current function's entry block.
    pub fn create_entry_alloca(
        &self,
        ty: BasicTypeEnum<'ctx>,
        name: &str,
    ) -> Result<PointerValue<'ctx>, Error> {
        let function = self.insertion_function()?;
        let entry = function.get_first_basic_block().ok_or_else(|| {
            Error::new(
                ErrorImpl::BackendError {
                    message: String::from("function has no entry block"),
                },
                Position::null(),
            )
        })?;

        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        Ok(builder.build_alloca(ty, name)?)
    }

    /// Runs `f` inside a fresh scope, popping it again on every exit path.
    pub fn with_scope<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.scopes.push(label);
        let result = f(self);
        self.scopes.pop();
        result
    }
}

/// The module driver: generates a whole program into a fresh module.
///
/// Built-in I/O helpers are registered first (when enabled). Global
/// initializers are generated inside a scaffold function that is deleted
/// once the program root has been generated. On error the partially built
/// compiler is dropped, so no half-generated module escapes.
pub fn compile<'ctx>(
    program: &Program,
    context: &'ctx Context,
    options: &CodegenOptions,
) -> Result<Compiler<'ctx>, Error> {
    let mut compiler = Compiler::new(context, &options.module_name);

    if options.register_io {
        register_io_functions(&compiler)?;
    }

    let scaffold = compiler.create_function(
        GLOBALS_SCAFFOLD,
        context.void_type().fn_type(&[], false),
        Some(Linkage::Internal),
    );

    let generated = compiler.with_scope("global", |compiler| {
        for unit in program.units.iter() {
            gen_unit(compiler, unit)?;
        }
        Ok(())
    });

    compiler.builder.clear_insertion_position();
    unsafe {
        scaffold.delete();
    }
    generated?;

    log::info!(
        "generated module `{}` ({} function(s))",
        options.module_name,
        compiler.module.get_functions().count()
    );

    if options.verify {
        compiler.verify()?;
    }

    Ok(compiler)
}
