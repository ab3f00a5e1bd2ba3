use std::process::ExitCode;
use tpt_reports::cli::run_from;

fn main() -> ExitCode {
    ExitCode::from(run_from(std::env::args_os()))
}
