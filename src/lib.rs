pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

use std::process::ExitCode;

pub fn run() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error while starting the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::exec()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tas-dash: {e}");
            ExitCode::FAILURE
        }
    }
}
