/// Entry point for the protocol stats exporter.
///
/// Samples `docker stats` for containers named `<protocol>-<service>` and writes
/// their CPU and memory usage to a Prometheus exposition file.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or if the single pass fails
/// when no interval is configured.
///
/// # Examples
///
/// ```bash
/// EXPORTER_OUTPUT_PATH=/var/lib/node_exporter/docker_stats.prom cargo run
/// EXPORTER_INTERVAL_SECS=5 EXPORTER_LISTEN_ADDR=0.0.0.0:9417 cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    protocol_stats_exporter::run().await?;
    Ok(())
}
