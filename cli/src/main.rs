mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use portscan_common::config::Config;
use portscan_common::error::ScanError;
use portscan_core::scanner::ScanStatus;
use terminal::{logging, print, terms};
use tracing::error;

const EXIT_INTERRUPTED: u8 = 130;
const EXIT_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging();
    let cfg: Config = commands.config();
    print::banner(cfg.no_banner, cfg.quiet);

    let code: ExitCode = match run(&commands, &cfg).await {
        Ok(ScanStatus::Completed) => ExitCode::SUCCESS,
        Ok(ScanStatus::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            error!("{e}");
            let code: u8 = e
                .downcast_ref::<ScanError>()
                .map(ScanError::exit_code)
                .unwrap_or(EXIT_FAILURE);
            ExitCode::from(code)
        }
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    code
}

async fn run(commands: &CommandLine, cfg: &Config) -> anyhow::Result<ScanStatus> {
    let mut request = commands.to_request().map_err(ScanError::from)?;
    if !request.terms_accepted {
        request.terms_accepted = terms::prompt(cfg.quiet)?;
        if !request.terms_accepted {
            print::print_status("Operation cancelled. Use --accept-terms to skip this notice.");
        }
    }

    print::header("getting ready", cfg.quiet);
    let prepared = portscan_core::prepare(&request).await?;
    scan::scan(prepared, cfg).await
}
