//! Tally runtime CLI

use clap::Parser;
use tallyc::cli::Cli;

fn main() {
    tallyc::init_tracing();

    let cli = Cli::parse();
    match tallyc::commands::dispatch(cli.command) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
