use anyhow::Context;
use clap::Parser;
use guestmem_host::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Run a wasm guest with host provided memory, `log` and string imports.
#[derive(Debug, Parser)]
#[command(name = "guestmem", version, about)]
pub struct Cli {
    /// wasm binary or wat text to run
    pub input: PathBuf,

    /// exported `() -> ()` function to call
    #[arg(long, default_value = EXPORT_MAIN)]
    pub entry: String,

    /// pages of linear memory to start with
    #[arg(long, default_value_t = 1)]
    pub initial_pages: u32,

    /// refuse to grow linear memory past this many pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// first allocation offset for guests that export neither `heap_ptr` nor `__heap_base`
    #[arg(long)]
    pub heap_base: Option<u32>,

    /// string imports return one packed i64 instead of two i32
    #[arg(long)]
    pub packed_returns: bool,
}

impl Cli {
    pub fn config(&self) -> RuntimeConfig {
        RuntimeConfig {
            initial_pages: self.initial_pages,
            max_pages: self.max_pages,
            heap_base: self.heap_base,
            entry_point: self.entry.clone(),
            return_convention: if self.packed_returns {
                ReturnConvention::Packed
            } else {
                ReturnConvention::MultiValue
            },
        }
    }
}

/// Logs go to stderr so they never mix with what the guest logs to stdout.
/// `RUST_LOG` controls the level, warnings only by default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read the whole module before anything is built, then run it.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let wasm = std::fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    tracing::info!(input = %cli.input.display(), bytes = wasm.len(), "loaded module");
    run_wasm_bytes(&wasm, cli.config())
        .with_context(|| format!("running `{}` in {}", cli.entry, cli.input.display()))
}
