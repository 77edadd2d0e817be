use std::{
    env,
    fs::{read_to_string, write},
    io::{self, Write},
    process::ExitCode,
    time::Instant,
};

use badlang::{check, display_error, errors::errors::Error, generate, interpret, parse};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: badlang <check|run|asm> <file> [-o <output>]";

enum Mode {
    Check,
    Run,
    Asm,
}

struct Options {
    mode: Mode,
    file_path: String,
    output: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mode = match args.get(1).map(String::as_str) {
        Some("check") => Mode::Check,
        Some("run") => Mode::Run,
        Some("asm") => Mode::Asm,
        Some(other) => return Err(format!("unknown mode '{}'", other)),
        None => return Err(String::from("missing mode")),
    };

    let file_path = args
        .get(2)
        .cloned()
        .ok_or_else(|| String::from("missing source file"))?;

    let output = match &args[3..] {
        [] => None,
        [flag, path] if flag == "-o" => Some(path.clone()),
        _ => return Err(String::from("unexpected arguments")),
    };

    Ok(Options {
        mode,
        file_path,
        output,
    })
}

fn report(errors: &[Error], source: &str, file_path: &str) {
    for error in errors {
        eprint!("{}", display_error(error, source, file_path));
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let source = match read_to_string(&options.file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", options.file_path, error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let program = match parse(&source) {
        Ok(program) => program,
        Err(error) => {
            report(&[error], &source, &options.file_path);
            return ExitCode::FAILURE;
        }
    };
    debug!(elapsed = ?start.elapsed(), "parsed");

    let check_start = Instant::now();
    let diagnostics = check(&program);
    debug!(elapsed = ?check_start.elapsed(), "checked");

    if !diagnostics.is_empty() {
        report(&diagnostics, &source, &options.file_path);
        return ExitCode::FAILURE;
    }

    match options.mode {
        Mode::Check => {
            info!(file = options.file_path.as_str(), "no problems found");
        }
        Mode::Run => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(error) = interpret(&program, &mut out) {
                let _ = out.flush();
                report(&[error], &source, &options.file_path);
                return ExitCode::FAILURE;
            }
        }
        Mode::Asm => {
            let assembly = match generate(&program) {
                Ok(assembly) => assembly,
                Err(error) => {
                    report(&[error], &source, &options.file_path);
                    return ExitCode::FAILURE;
                }
            };

            let written = match &options.output {
                Some(path) => write(path, assembly),
                None => io::stdout().write_all(assembly.as_bytes()),
            };
            if let Err(error) = written {
                eprintln!("Failed to write assembly: {}", error);
                return ExitCode::FAILURE;
            }
        }
    }

    debug!(elapsed = ?start.elapsed(), "finished");
    ExitCode::SUCCESS
}
