use anyhow::{Context, Result};
use aurora_evm_codegen::{Config, Translator, disasm};
use aurora_ir_data::decode;
use clap::Parser;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aurora")]
#[command(about = "Aurora IR to EVM bytecode compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Encoded instruction stream (use '-' or omit for stdin)
    input: Option<PathBuf>,

    /// Write raw bytecode to this file instead of printing hex
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the runtime code without the instantiate prefix
    #[arg(long)]
    runtime_only: bool,

    /// Print an opcode listing of the result to stderr
    #[arg(long)]
    disasm: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path.to_str() != Some("-") => {
            fs::read(path).with_context(|| format!("failed to read file '{}'", path.display()))
        }
        _ => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).context("failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = read_input(cli.input.as_ref())?;
    let stream = decode(&source).context("failed to decode instruction stream")?;
    info!(instructions = stream.len(), "decoded stream");

    let config = if cli.runtime_only { Config::runtime_only() } else { Config::default() };
    let mut translator = Translator::with_config(stream, config);
    translator.translate().context("failed to translate program")?;

    if cli.disasm {
        let listing = disasm::listing(translator.bytecode()).context("failed to disassemble")?;
        eprint!("{listing}");
    }

    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            translator.write_to(&mut file).context("failed to write bytecode")?;
            info!(bytes = translator.bytecode().len(), path = %path.display(), "wrote bytecode");
        }
        None => {
            print!("0x");
            for byte in translator.bytecode() {
                print!("{byte:02x}");
            }
            println!();
        }
    }
    Ok(())
}
