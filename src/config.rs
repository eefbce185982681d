//! Compiler configuration.
//!
//! `CompilerConfig` is what the command line resolves to; `CodegenOptions`
//! is the subset the module driver needs.

use std::path::PathBuf;

use inkwell::OptimizationLevel;

/// Artifacts that can be written for a compiled module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    /// Textual LLVM IR (`.ll`)
    LlvmIr,
    /// Native object file (`.o`)
    Object,
}

impl EmitKind {
    pub fn extension(&self) -> &'static str {
        match self {
            EmitKind::LlvmIr => "ll",
            EmitKind::Object => "o",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    pub module_name: String,
    /// Define `printBool`, `printChar`, `printInt` and `printString`
    pub register_io: bool,
    /// Run the LLVM verifier once the module is generated
    pub verify: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            module_name: String::from("main"),
            register_io: true,
            verify: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub emit: Vec<EmitKind>,
    /// JIT-run `main` after compiling
    pub run: bool,
    pub verbose: u8,
    pub quiet: bool,
    /// 0 to 3, clamped
    pub opt_level: u8,
}

impl CompilerConfig {
    pub fn codegen_options(&self) -> CodegenOptions {
        let module_name = self
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("main"));

        CodegenOptions {
            module_name,
            ..CodegenOptions::default()
        }
    }

    pub fn optimization_level(&self) -> OptimizationLevel {
        match self.opt_level {
            0 => OptimizationLevel::None,
            1 => OptimizationLevel::Less,
            2 => OptimizationLevel::Default,
            _ => OptimizationLevel::Aggressive,
        }
    }

    /// Path of the artifact of the given kind, `<output_dir>/<stem>.<ext>`.
    pub fn output_path(&self, kind: EmitKind) -> PathBuf {
        let stem = self
            .input
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| "out".into());

        let mut path = self.output_dir.join(stem);
        path.set_extension(kind.extension());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompilerConfig {
        CompilerConfig {
            input: PathBuf::from("src/fib.c"),
            output_dir: PathBuf::from("build"),
            emit: vec![EmitKind::LlvmIr],
            run: false,
            verbose: 0,
            quiet: false,
            opt_level: 0,
        }
    }

    #[test]
    fn test_output_paths() {
        let config = config();
        assert_eq!(
            config.output_path(EmitKind::LlvmIr),
            PathBuf::from("build/fib.ll")
        );
        assert_eq!(
            config.output_path(EmitKind::Object),
            PathBuf::from("build/fib.o")
        );
    }

    #[test]
    fn test_codegen_options_use_file_stem() {
        let options = config().codegen_options();
        assert_eq!(options.module_name, "fib");
        assert!(options.register_io);
        assert!(options.verify);
    }

    #[test]
    fn test_optimization_level_is_clamped() {
        let mut config = config();
        config.opt_level = 9;
        assert_eq!(config.optimization_level(), OptimizationLevel::Aggressive);
        config.opt_level = 0;
        assert_eq!(config.optimization_level(), OptimizationLevel::None);
    }
}
