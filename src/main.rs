mod cli;

use std::error::Error;

use clap::Parser;
use cli::{Cli, Command, apply::handle_apply_command, query::handle_query_command};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.cmd {
        Command::Apply(args) => handle_apply_command(args),
        Command::Query(args) => handle_query_command(args),
    };

    result.map_err(|e| {
        eprintln!("Error: {}", e);
        e
    })
}
