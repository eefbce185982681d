use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use minic::config::{CompilerConfig, EmitKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum EmitKindCli {
    /// Textual LLVM IR
    LlvmIr,
    /// Native object file
    Obj,
}

impl From<EmitKindCli> for EmitKind {
    fn from(value: EmitKindCli) -> EmitKind {
        match value {
            EmitKindCli::LlvmIr => EmitKind::LlvmIr,
            EmitKindCli::Obj => EmitKind::Object,
        }
    }
}

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "minic", version, about = "Compiles a small C-like language to LLVM IR")]
pub struct Cli {
    /// Source file to compile
    pub file: PathBuf,

    /// Output directory
    #[arg(short = 'o', long = "output", default_value = "build")]
    pub output_dir: PathBuf,

    /// Artifacts to emit
    #[arg(long, value_enum, value_delimiter = ',', default_value = "llvm-ir")]
    pub emit: Vec<EmitKindCli>,

    /// Run `main` in-process after compiling and exit with its result
    #[arg(long)]
    pub run: bool,

    /// Optimization level used for object files (0-3)
    #[arg(short = 'O', default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub opt_level: u8,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl From<Cli> for CompilerConfig {
    fn from(cli: Cli) -> CompilerConfig {
        // Each artifact once, in first-requested order
        let mut emit: Vec<EmitKind> = Vec::new();
        for kind in cli.emit.into_iter().map(EmitKind::from) {
            if !emit.contains(&kind) {
                emit.push(kind);
            }
        }

        CompilerConfig {
            input: cli.file,
            output_dir: cli.output_dir,
            emit,
            run: cli.run,
            verbose: cli.verbose,
            quiet: cli.quiet,
            opt_level: cli.opt_level,
        }
    }
}
