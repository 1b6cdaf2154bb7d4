use color_eyre::eyre::WrapErr;
use tracing::{error, info};

use homework_watch::{
    HomeworkPoller, ReviewApi, TelegramNotifier, WatchConfig,
    logging::{LoggingConfig, init_logging},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let _log_guard = init_logging(LoggingConfig::from_env())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to initialize logging: {e}"))?;
    info!(version = env!("CARGO_PKG_VERSION"), "Homework watch starting up");

    let config = WatchConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Startup precondition failed, refusing to start");
    })?;

    let api = ReviewApi::new(config.client.clone()).wrap_err("Failed to build review API client")?;
    let notifier = TelegramNotifier::new(config.telegram.clone(), config.client.request.timeout)
        .wrap_err("Failed to build Telegram client")?;

    let mut poller = HomeworkPoller::new(api, notifier, config.polling.clone());
    let shutdown = poller.shutdown_sender();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping after the current cycle");
            let _ = shutdown.send(());
        }
    });

    poller.run().await;

    info!("Homework watch stopped");
    Ok(())
}
