//! Verification daemon: an always-on auditor over the record store.

use anyhow::Context;
use tracing::info;

use edgeproof::config::Config;
use edgeproof::store::GraphqlStore;
use edgeproof::verifier::Verifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!(
        url = %config.graphql_url,
        interval = ?config.poll_interval,
        limit = config.poll_limit,
        "starting verifier"
    );

    let store = GraphqlStore::new(config.graphql_url.clone(), config.fetch_timeout)
        .context("building store client")?;
    let mut verifier = Verifier::new(store, config.poll_limit);

    tokio::select! {
        _ = verifier.run(config.poll_interval) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
