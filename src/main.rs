use clap::Parser;
use downloads_organizer::cli::{Cli, run_cli};
use downloads_organizer::console::TerminalConsole;
use downloads_organizer::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let options = cli.into_options();
    let mut console = TerminalConsole::new();

    match run_cli(&options, &mut console) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
