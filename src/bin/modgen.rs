use clap::Parser;
use modgen::cli::{run_cli, Cli};
use modgen::logging::{init_logging_with_config, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("⚠️  Logging disabled: {e:#}");
    }

    match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::from(2)
        }
    }
}
