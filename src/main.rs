use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simple_logger::SimpleLogger;

use quill_lang::Environment;

/// Runs a Quill script file.
///
/// Grounded on the teacher's `main.rs` (`clap`-derived `Cli { file:
/// PathBuf }`, `simple_logger::SimpleLogger::new().init()`, read the
/// file, hand it to the interpreter, report the `anyhow::Error` at the
/// boundary), generalized with a `--trace` flag that raises the log
/// level to `Trace` for debugging a misbehaving script.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the script to run.
    file: PathBuf,

    /// Emit trace-level logging instead of the default `info` level.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.trace {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialize logger: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = fs::read_to_string(&cli.file)
        .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", cli.file.display()))?;

    let mut env = Environment::new();
    let program = env.compile(&source)?;
    let result = env.call(&program, Vec::new())?;
    log::info!("{} finished with {:?}", cli.file.display(), result);
    Ok(())
}
