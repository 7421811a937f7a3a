use std::process::ExitCode;

use clap::Parser;
use ocr_logging::ocr_error;

mod cli;
mod platform;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    ocr_logging::initialize(cli.log_destination(), cli.log_level());

    match platform::run(cli) {
        Ok(code) => code,
        Err(err) => {
            ocr_error!("ocr_client failed: {:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
