mod cli;

use std::{fs, path::Path, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use colored::Colorize;
use inkwell::context::Context;
use minic::{
    compiler::{
        compiler::compile,
        emit::{exit_status, run_main, write_object_file},
    },
    config::{CompilerConfig, EmitKind},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    logging,
    parser::parser::parse,
    render_error, Position,
};

use crate::cli::Cli;

fn main() -> ExitCode {
    let config: CompilerConfig = Cli::parse().into();
    logging::init(config.verbose, config.quiet);

    let source = match fs::read_to_string(&config.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!(
                "{}: failed to read {}: {}",
                "Error".red().bold(),
                config.input.display(),
                error
            );
            return ExitCode::FAILURE;
        }
    };

    match build(&config, &source) {
        Ok(Some(result)) => ExitCode::from(exit_status(result)),
        Ok(None) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", render_error(&error, &source));
            ExitCode::FAILURE
        }
    }
}

/// Runs the whole pipeline. Returns `main`'s result when `--run` was given.
fn build(config: &CompilerConfig, source: &str) -> Result<Option<i32>, Error> {
    let file_name = config
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let start = Instant::now();

    let tokens = tokenize(String::from(source), Some(file_name.clone()))?;
    log::debug!("lexed {} token(s)", tokens.len());

    let program = parse(tokens, Rc::new(file_name))?;
    log::debug!("parsed {} top-level unit(s)", program.units.len());

    let context = Context::create();
    let compiler = compile(&program, &context, &config.codegen_options())?;

    if !config.emit.is_empty() {
        create_output_dir(&config.output_dir)?;
    }

    for kind in config.emit.iter() {
        let path = config.output_path(*kind);
        match kind {
            EmitKind::LlvmIr => compiler.save_module_to_file(&path)?,
            EmitKind::Object => {
                write_object_file(&compiler.module, &path, config.optimization_level())?
            }
        }
        log::info!("wrote {}", path.display());
    }

    log::info!("compiled {} in {:.2?}", config.input.display(), start.elapsed());

    if config.run {
        return run_main(&compiler).map(Some);
    }

    Ok(None)
}

fn create_output_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|error| {
        Error::new(
            ErrorImpl::BackendError {
                message: format!("failed to create {}: {}", dir.display(), error),
            },
            Position::null(),
        )
    })
}
