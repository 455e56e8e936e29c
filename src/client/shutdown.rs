use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Resolves once Ctrl-C is received or the token is cancelled elsewhere. Receiving Ctrl-C cancels
/// the token.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!("Received Ctrl-C");
                    cancelation.cancel();
                }
                Err(e) => {
                    error!("Can't listen for Ctrl-C {e:?}");
                    cancelation.cancelled().await;
                }
            }
        },
        _ = cancelation.cancelled() => {},
    };
}
