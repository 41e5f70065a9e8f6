use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use coastline::{app, logging, RunOptions};

#[derive(Debug, Parser)]
#[command(author, version, about = "Coastline map prototype")]
struct Cli {
    /// Path to the key=value configuration file
    config: Option<PathBuf>,

    /// Write the rendered map as JSON to this file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let Some(config_path) = cli.config else {
        let program = std::env::args()
            .next()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        print!("{}", app::usage(&program));
        return Ok(ExitCode::FAILURE);
    };

    let mut options = RunOptions::new(config_path);
    if let Some(path) = cli.snapshot {
        options = options.with_snapshot(path);
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    match app::run(&options, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            debug!(?err, "run failed");
            eprintln!("Error: {err}");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
