mod config;

use crate::config::GlobalConfig;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use bot::{
    communicator::{Communicate, Communicator},
    webhook,
};
use eyre::eyre;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{sync::Arc, time::Duration};
use tokio::signal;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let level = dotenv::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Debug);

    SimpleLogger::new()
        .with_level(LevelFilter::Off)
        .with_module_level("janitor", level)
        .with_module_level("bot", level)
        .with_module_level("api", level)
        .init()?;

    let token = dotenv::var("BOT_TOKEN").map_err(|err| eyre!("BOT_TOKEN is not set, {err}"))?;
    let config = GlobalConfig::load()?;
    let addr = config.socket_addr()?;

    let communicator = Communicator::with_config(token.as_str(), config.communicator_config())?;
    let comm: Arc<dyn Communicate> = Arc::new(communicator);

    let webhook_config = config.webhook_config();
    webhook::register(comm.as_ref(), &webhook_config).await?;
    let app = webhook::router(&webhook_config, comm);

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    match config.tls() {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("janitor is listening on https://{addr}{}", webhook_config.path);
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("janitor is listening on http://{addr}{}", webhook_config.path);
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("janitor stopped");
    Ok(())
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("shutdown signal received, finishing in-flight updates..");
            handle.graceful_shutdown(Some(Duration::from_secs(10)));
        }
        Err(err) => {
            error!("unable to listen for shutdown signal: {err}");
        }
    }
}
