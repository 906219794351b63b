mod cli;
mod query;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = query::run(cli.query()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
