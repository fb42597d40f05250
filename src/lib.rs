use std::sync::Arc;

use config::Config;
use exporter::Exporter;
use sampler::DockerStatsSampler;

/// Protocol Stats Exporter: samples per-container CPU and memory usage from the
/// container runtime and publishes it as a Prometheus text exposition file.
///
/// Only containers named `<protocol>-<service>[-...]` are exported, labelled with
/// their protocol and service so benchmark runs can be compared across protocols.
pub mod api;
pub mod config;
pub mod container;
pub mod error;
pub mod exporter;
pub mod exposition;
pub mod fsutil;
pub mod sampler;
pub mod stats;

/// Runs the exporter.
///
/// Without `EXPORTER_INTERVAL_SECS` a single pass is run. Otherwise passes run on
/// every tick until the process is stopped, and `EXPORTER_LISTEN_ADDR` optionally
/// serves the published document over HTTP.
///
/// # Errors
///
/// - [`error::Error::Config`] if the environment holds invalid values.
/// - [`error::Error::Bind`] if the metrics endpoint cannot be bound.
/// - In single-pass mode, any error of that pass.
///
/// A failed pass in interval mode is logged and does not stop the exporter.
pub async fn run() -> error::Result<()> {
    let config = Config::from_env()?;
    log::debug!("Configuration: {config:?}");

    let sampler = DockerStatsSampler::new(config.docker_bin, config.stats_format);
    let exporter = Arc::new(Exporter::new(
        sampler,
        config.exposition,
        config.output_path,
    ));

    let Some(period) = config.interval else {
        return run_pass(exporter).await.inspect_err(|err| {
            log::error!("pass failed: {err}");
        });
    };

    if let Some(addr) = config.listen_addr {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| error::Error::Bind { addr, source })?;
        log::info!("serving metrics on http://{addr}/metrics");
        let api = api::APIServer::new(exporter.output_path().to_path_buf());
        tokio::spawn(async move {
            if let Err(err) = api.listen(listener).await {
                log::error!("metrics endpoint stopped: {err}");
            }
        });
    }

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if let Err(err) = run_pass(Arc::clone(&exporter)).await {
            log::error!("pass failed, keeping previous metrics: {err}");
        }
    }
}

async fn run_pass(exporter: Arc<Exporter<DockerStatsSampler>>) -> error::Result<()> {
    tokio::task::spawn_blocking(move || exporter.run_pass()).await??;
    Ok(())
}
