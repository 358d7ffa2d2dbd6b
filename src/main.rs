use anyhow::Result;

use usta_tournament_map::cli::Command;
use usta_tournament_map::{handle_dashboard, handle_serve, handle_update, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Update {
            max_pages,
            min_delay,
            max_delay,
        } => handle_update(*max_pages, *min_delay, *max_delay),
        Command::Serve { port } => handle_serve(*port),
        Command::Dashboard => handle_dashboard(),
    }
}
