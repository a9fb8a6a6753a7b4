use anyhow::Result;
use clap::Parser;
use tracing::error;

use traffic_report::utils::{setup_logging, validate_args};
use traffic_report::{generate_report, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    match generate_report(&args.to_config()) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(error = %e, "Report failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
