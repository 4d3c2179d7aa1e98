use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{Diagnostic, IntoDiagnostic, Result, WrapErr};
use stackloop::render_error;
use stackloop_core::{
    api::ExecutionOptions,
    compiler,
    expr,
    vm::{CodecError, ListingError, Program, VM},
};
use tracing::{debug, info};

/// stackloop - compile and run programs for a tiny stack machine
#[derive(Parser, Debug)]
#[command(name = "stackloop")]
#[command(about = "Compile, run and disassemble stackloop programs", long_about = None)]
struct Args {
    /// Log every executed instruction (debug builds only)
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a postcard-encoded expression tree
    Compile {
        /// Encoded tree
        input: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the postcard-encoded program instead of a listing
        #[arg(long)]
        binary: bool,
    },

    /// Run a listing, or a postcard-encoded program if the file ends in `.bin`
    Run {
        program: PathBuf,

        /// Initial slot value; repeat for slots 0, 1, ...
        #[arg(long = "slot", allow_hyphen_values = true)]
        slots: Vec<i64>,

        /// Give up after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,
    },

    /// Print the addressed listing of a postcard-encoded program
    Disasm { program: PathBuf },
}

#[derive(Debug, thiserror::Error, Diagnostic)]
enum CliError {
    #[error("could not read `{}`", .path.display())]
    #[diagnostic(code(stackloop::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(stackloop::listing))]
    Listing(#[from] ListingError),

    #[error(transparent)]
    #[diagnostic(
        code(stackloop::codec),
        help("binary inputs must be written by `stackloop compile --binary` or the library's to_bytes")
    )]
    Codec(#[from] CodecError),
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_program(path: &Path) -> Result<Program, CliError> {
    let bytes = read(path)?;
    if path.extension().is_some_and(|ext| ext == "bin") {
        Ok(Program::from_bytes(&bytes)?)
    } else {
        let text = String::from_utf8_lossy(&bytes);
        Ok(Program::from_listing(&text)?)
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .into_diagnostic()
            .wrap_err_with(|| format!("could not write `{}`", path.display())),
        None => std::io::stdout()
            .write_all(bytes)
            .into_diagnostic()
            .wrap_err("could not write to stdout"),
    }
}

fn compile(input: &Path, output: Option<&Path>, binary: bool) -> Result<()> {
    let tree = expr::from_bytes(&read(input)?).map_err(CliError::from)?;
    debug!(%tree, "decoded tree");

    let program = compiler::compile(&tree);
    info!(instructions = program.len(), "compiled");

    let bytes = if binary {
        program.to_bytes().map_err(CliError::from)?
    } else {
        program.to_string().into_bytes()
    };
    write_output(output, &bytes)
}

fn run(path: &Path, slots: &[i64], max_steps: Option<u64>) -> Result<()> {
    let program = load_program(path)?;
    if let Err(e) = program.validate() {
        render_error(&e, &program);
        std::process::exit(1);
    }

    let options = ExecutionOptions {
        max_steps,
        ..Default::default()
    };
    let mut vm = VM::with_options(&program, options).with_initial_slots(slots);
    match vm.run() {
        Ok(value) => {
            debug!(steps = vm.steps(), stack = ?vm.stack(), "finished");
            println!("{value}");
            Ok(())
        }
        Err(e) => {
            render_error(&e, &program);
            std::process::exit(1);
        }
    }
}

fn disasm(path: &Path) -> Result<()> {
    let program = Program::from_bytes(&read(path)?).map_err(CliError::from)?;
    print!("{program:#}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, filter::Directive, fmt};

    // Use RUST_LOG to control log level, default to WARN if not set
    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;
    if args.trace {
        let directive = "stackloop_core=trace".parse::<Directive>().into_diagnostic()?;
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Command::Compile {
            input,
            output,
            binary,
        } => compile(&input, output.as_deref(), binary),
        Command::Run {
            program,
            slots,
            max_steps,
        } => run(&program, &slots, max_steps),
        Command::Disasm { program } => disasm(&program),
    }
}
