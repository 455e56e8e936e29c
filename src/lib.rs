//! Startup orchestration for the drops miner client.
//! Parses invocation options, derives the logging setup from them, makes sure only one
//! instance is visible on the machine and then hands control to the client.
//!

pub mod cli;
pub mod client;
pub mod utils;
pub mod window_api;
