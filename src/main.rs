use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser as ClapParser, ValueEnum};
use inkwell::context::Context;
use lotus::{
    compiler::compiler::{compile, OutputFormat},
    display_error,
    lexer::lexer::Lexer,
    parser::parser::parse,
    source::SourceFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Textual LLVM IR, written to output.ll
    Ll,
    /// LLVM bitcode, written to output.bc
    Bc,
}

impl From<Emit> for OutputFormat {
    fn from(emit: Emit) -> Self {
        match emit {
            Emit::Ll => OutputFormat::TextualIr,
            Emit::Bc => OutputFormat::Bitcode,
        }
    }
}

/// Compiles a lotus source file to LLVM IR.
#[derive(Debug, ClapParser)]
#[command(version, about)]
struct Args {
    /// The source file, must end in .lt
    source: PathBuf,

    /// Output representation
    #[arg(long, value_enum, default_value_t = Emit::Ll)]
    emit: Emit,

    /// Log more, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let source = match SourceFile::from_path(&args.source) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let lexer = Lexer::new(source.contents.clone(), Some(source.name.clone()));
    let file = lexer.file();
    let (_, program) = parse(lexer, file);

    println!("Parsed in {:?}", start.elapsed());

    let program = match program {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &source.contents);
            return ExitCode::FAILURE;
        }
    };

    let compile_start = Instant::now();
    let context = Context::create();
    let compiler = match compile(&program, &source.name, &context) {
        Ok(compiler) => compiler,
        Err(error) => {
            eprintln!("Error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    println!("Compiled in {:?}", compile_start.elapsed());

    let format = OutputFormat::from(args.emit);
    let output_file = PathBuf::from(format.file_name());
    if let Err(error) = compiler.emit(format, &output_file) {
        eprintln!("Error: {}", error);
        return ExitCode::FAILURE;
    }

    println!("Total time for IR generation: {:?}", start.elapsed());
    log::info!("wrote {}", output_file.display());

    ExitCode::SUCCESS
}
