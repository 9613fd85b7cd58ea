// src/poller.rs
use crate::config::Config;
use crate::models::endpoint::Endpoint;
use crate::protocol::master::discover_addresses;
use crate::protocol::QueryOptions;
use crate::scrape::scrape;
use crate::storage::memory::ServerStorage;
use log::info;
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::{Builder, Runtime};

/// Worker-per-target queries get their own multi-threaded runtime, apart
/// from the HTTP server's per-worker event loops.
pub fn build_runtime() -> io::Result<Runtime> {
    Builder::new_multi_thread()
        .thread_name("qwscrape-poller")
        .enable_all()
        .build()
}

/// One polling cycle: discover, scrape, publish. Returns the record count.
pub async fn poll_once(masters: &[Endpoint], options: &QueryOptions, storage: &ServerStorage) -> usize {
    let addresses = discover_addresses(masters, options).await;
    let servers = scrape(&addresses, options).await;
    let count = servers.len();
    info!("Polled {} of {} servers", count, addresses.len());

    storage.replace(servers);
    count
}

/// Runs the polling loop forever on a dedicated thread.
pub fn spawn(config: Config, storage: Arc<ServerStorage>) -> io::Result<JoinHandle<()>> {
    let runtime = build_runtime()?;

    std::thread::Builder::new()
        .name("qwscrape-poller".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let options = config.query_options();
                let mut ticker = tokio::time::interval(config.update_interval());

                loop {
                    ticker.tick().await;
                    poll_once(&config.master_servers, &options, &storage).await;
                }
            })
        })
}
