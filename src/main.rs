use anyhow::Result;
use clap::Parser;
use drops_miner::cli::{args::Options, run_cli};

fn main() -> Result<()> {
    let options = Options::parse();
    // A duplicate instance and a finished run both end with exit code 0.
    run_cli(options)?;
    Ok(())
}
