//! Ingest daemon: device lines in, signed records out.

use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;

use edgeproof::config::Config;
use edgeproof::ingest::IngestPipeline;
use edgeproof::keystore;
use edgeproof::source::LineSource;
use edgeproof::store::GraphqlStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!(
        device = %config.device_path.display(),
        url = %config.graphql_url,
        "starting ingest"
    );

    // A corrupt key file must halt startup, not mint a fresh identity.
    let keypair = keystore::load_or_create(&config.key_path)
        .with_context(|| format!("loading signing key from {}", config.key_path.display()))?;
    info!(signer = %keypair.public_key().to_base64(), "signing identity ready");

    let store = GraphqlStore::new(config.graphql_url.clone(), config.submit_timeout)
        .context("building sink client")?;

    let device = tokio::fs::File::open(&config.device_path)
        .await
        .with_context(|| format!("opening event source {}", config.device_path.display()))?;
    let mut source = LineSource::new(BufReader::new(device));

    let mut pipeline = IngestPipeline::new(keypair, store, config.error_pause);

    tokio::select! {
        result = pipeline.run(&mut source) => {
            result.context("event source failed")?;
            info!("event source closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
