use clap::Parser;
use guestmem_cli::Cli;

fn main() {
    guestmem_cli::init_tracing();
    let cli = Cli::parse();
    if let Err(e) = guestmem_cli::run(&cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
