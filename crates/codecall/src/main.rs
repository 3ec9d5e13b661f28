use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use codecall_core::{config::Config, ports::TelephonyPort, scheduler::CallScheduler};
use codecall_http::AppState;
use codecall_twilio::TwilioClient;

#[tokio::main]
async fn main() -> Result<(), codecall_core::Error> {
    if let Err(e) = codecall_core::logging::init("codecall") {
        eprintln!("{e}");
    }

    let cfg = Arc::new(Config::load());
    tracing::debug!(config = ?cfg, "configuration loaded");

    let telephony: Arc<dyn TelephonyPort> = Arc::new(TwilioClient::from_config(&cfg));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!("Ctrl-C handler unavailable: {e}"),
            }
        });
    }

    let scheduler = CallScheduler::new(cfg.clone(), telephony.clone());
    let scheduler_task = scheduler.spawn(shutdown.clone());

    let state = Arc::new(AppState::new(cfg.clone(), telephony));
    let served = codecall_http::serve(cfg.listen_addr, state, shutdown.clone()).await;

    // Listener failure (e.g. bind) also takes the scheduler down.
    shutdown.cancel();
    if let Err(e) = scheduler_task.await {
        tracing::error!("Call scheduler task failed: {e}");
    }

    served
}
