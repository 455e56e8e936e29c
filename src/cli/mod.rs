pub mod args;
pub mod launcher;

use anyhow::Result;
use args::Options;
use launcher::{Launcher, Outcome};

use crate::{client::Client, utils::logging::GlobalLogging, window_api::GenericInstanceGuard};

/// Runs the application with the platform instance check and global logging.
pub fn run_cli(options: Options) -> Result<Outcome> {
    Launcher::new(GenericInstanceGuard::new(), GlobalLogging).launch(options, Client::new)
}
