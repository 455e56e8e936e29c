use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::{
    client::Controller,
    utils::logging::{LoggingConfig, LoggingSetup},
    window_api::InstanceGuard,
};

use super::args::Options;

/// How startup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Another instance is visible. Nothing was configured or constructed.
    AlreadyRunning,
    /// The controller ran to completion.
    Completed,
}

/// Runs the startup sequence: instance check, logging setup, controller run. Every step happens
/// once and in that order.
pub struct Launcher<G, L> {
    guard: G,
    logging: L,
}

impl<G: InstanceGuard, L: LoggingSetup> Launcher<G, L> {
    pub fn new(guard: G, logging: L) -> Self {
        Self { guard, logging }
    }

    /// Hands control to the controller built by `build`. Returns once its run is over, failures
    /// of the run are logged and propagated as is.
    pub fn launch<C, F>(self, options: Options, build: F) -> Result<Outcome>
    where
        C: Controller,
        F: FnOnce(Arc<Options>) -> Result<C>,
    {
        let Self { guard, mut logging } = self;
        let running = guard.is_running();
        // Platform handles of the check aren't needed past this point.
        drop(guard);
        if running {
            return Ok(Outcome::AlreadyRunning);
        }

        let options = Arc::new(options);
        let config = LoggingConfig::from_options(&options);
        // Held until the run is over so the log file is flushed on the way out.
        let _logging = logging.configure(&config)?;
        debug!("Logging configured {config:?}");
        info!("Starting with {options:?}");

        let mut controller =
            build(Arc::clone(&options)).inspect_err(|e| error!("Failed to create client {e:?}"))?;
        controller
            .run()
            .inspect_err(|e| error!("Client stopped with an error {e:?}"))?;

        info!("Client finished");
        Ok(Outcome::Completed)
    }
}
