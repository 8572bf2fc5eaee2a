mod commands;
mod terminal;

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::error;

use commands::{CommandLine, check};
use terminal::{logging, print};

/// Exit code when the check itself could not run.
const EXIT_UNKNOWN: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = match CommandLine::try_parse() {
        Ok(commands) => commands,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_UNKNOWN),
            };
        }
    };

    logging::init_logging(commands.log_level());

    let result = match check::check(commands).await {
        Ok(result) => result,
        Err(e) => {
            error!("{e:#}");
            check::failure(&e)
        }
    };

    print::result(&result);
    ExitCode::from(result.code())
}
