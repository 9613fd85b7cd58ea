// src/scrape.rs
use crate::models::endpoint::Endpoint;
use crate::models::server::ServerRecord;
use crate::protocol::status::query_server;
use crate::protocol::QueryOptions;
use log::{debug, error};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Records from one polling cycle, unique by address, in completion order.
pub type ScrapeResult = Vec<ServerRecord>;

/// Polls every distinct endpoint concurrently and collects the servers that
/// answered. Unreachable or misbehaving servers are simply absent.
///
/// Queries run as independent tasks, at most `max_concurrency` at a time;
/// the join loop below is the only writer of the result.
pub async fn scrape(endpoints: &[Endpoint], options: &QueryOptions) -> ScrapeResult {
    let limiter = (options.max_concurrency > 0).then(|| Arc::new(Semaphore::new(options.max_concurrency)));
    let mut queued = HashSet::new();
    let mut tasks = JoinSet::new();

    for endpoint in endpoints {
        if !queued.insert(endpoint.clone()) {
            continue;
        }

        let endpoint = endpoint.clone();
        let options = options.clone();
        let limiter = limiter.clone();

        tasks.spawn(async move {
            let _permit = match limiter {
                Some(limiter) => limiter.acquire_owned().await.ok(),
                None => None,
            };
            query_server(&endpoint, &options).await
        });
    }

    debug!("Polling {} unique servers ({} given)", queued.len(), endpoints.len());

    let mut processed = HashSet::new();
    let mut records = ScrapeResult::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(record)) => {
                if processed.insert(record.address.clone()) {
                    records.push(record);
                }
            }
            Ok(Err(_)) => {}
            Err(e) => error!("Server query task failed: {}", e),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn empty_input_is_an_empty_result() {
        let records = scrape(&[], &QueryOptions::default()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn dead_servers_are_dropped_silently() {
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();
        let options = QueryOptions::new(1, Duration::from_millis(20)).with_max_concurrency(1);

        let endpoint = Endpoint::new("127.0.0.1", port);
        let records = scrape(&[endpoint.clone(), endpoint], &options).await;
        assert!(records.is_empty());
    }
}
