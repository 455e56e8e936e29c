//! The client side of the orchestration contract. [Controller] is all the launcher knows about,
//! [Client] is the controller the binary runs.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{cli::args::Options, utils::runtime::single_thread_runtime};

pub mod shutdown;

/// Owns the main run loop of the application. Constructed from the finalized options.
#[cfg_attr(test, mockall::automock)]
pub trait Controller {
    /// Blocks until the application is done.
    fn run(&mut self) -> Result<()>;
}

pub struct Client {
    options: Arc<Options>,
    shutdown: CancellationToken,
}

impl Client {
    pub fn new(options: Arc<Options>) -> Result<Self> {
        Ok(Self {
            options,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Cancelling the token stops [Controller::run].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    async fn serve(&self) {
        info!("Starting client");
        match self.options.game() {
            Some(game) => info!("Mining drops for {game}"),
            None => info!("Mining drops for every available game"),
        }
        if self.options.tray() {
            info!("Starting minimized to the tray");
        }

        shutdown::detect_shutdown(self.shutdown.clone()).await;
        info!("Client stopped");
    }
}

impl Controller for Client {
    fn run(&mut self) -> Result<()> {
        single_thread_runtime()?.block_on(self.serve());
        Ok(())
    }
}
