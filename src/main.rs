use std::io;
use std::process::ExitCode;

use anyhow::Result;

use naming_convention::cli::{get_config_option, get_log_file, get_matches, get_verbosity, run_command};
use naming_convention::config::{load_config, resolve_config_path};
use naming_convention::logging::init_logger;

fn run() -> Result<bool> {
    let matches = get_matches();
    init_logger(get_verbosity(&matches), &get_log_file(&matches))?;

    let config_path = resolve_config_path(get_config_option(&matches))?;
    let catalog = load_config(&config_path)?.compile()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&matches, &catalog, &mut out)
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
