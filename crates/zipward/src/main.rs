use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zipward_fs::OsFs;

use cli::app::App;

mod cli;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let app = App::parse();
    init_tracing(app.verbose);

    match cli::run::run(&OsFs::new(), app.cmd) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
