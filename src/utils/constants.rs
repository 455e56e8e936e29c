/// Title of the client window. Used for detecting an instance that is already running, so
/// different versions can run side by side.
pub const WINDOW_TITLE: &str = concat!("Drops Miner v", env!("CARGO_PKG_VERSION"));

/// File that receives application logs when file logging is requested. Relative to the working
/// directory.
pub const LOG_PATH: &str = "log.txt";

/// Timestamp layout of the log file.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Target of the application logger. Every event emitted from this crate falls under it.
pub const APP_TARGET: &str = "drops_miner";
/// Target of the raw websocket traffic logger.
pub const WEBSOCKET_TARGET: &str = "drops_miner::websocket";
/// Target of the raw GQL traffic logger.
pub const GQL_TARGET: &str = "drops_miner::gql";
