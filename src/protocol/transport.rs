// src/protocol/transport.rs
use crate::error::QueryError;
use crate::models::endpoint::Endpoint;
use log::debug;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

pub const BUFFER_SIZE: usize = 8192;

/// Sends `packet` to `endpoint` and waits for one datagram back.
///
/// Each attempt gets its own deadline for the send and for the receive.
/// Send/receive failures and timeouts move on to the next attempt; resolve,
/// bind and connect failures end the query at once. Payload validation is
/// left to the caller, so a reply is never retried because of its content.
pub async fn request(
    endpoint: &Endpoint,
    packet: &[u8],
    retries: u32,
    deadline: Duration,
) -> Result<Vec<u8>, QueryError> {
    let address = endpoint.to_string();
    let server_addr = resolve_ipv4(endpoint).await?;

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|source| QueryError::Io { address: address.clone(), source })?;
    socket
        .connect(server_addr)
        .await
        .map_err(|source| QueryError::Io { address: address.clone(), source })?;

    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut last_error = QueryError::NoAttempts { address: address.clone() };

    for attempt in 1..=retries {
        match timeout(deadline, socket.send(packet)).await {
            Ok(Ok(_)) => {}
            Ok(Err(source)) => {
                last_error = QueryError::Io { address: address.clone(), source };
                continue;
            }
            Err(_) => {
                last_error = QueryError::Timeout { address: address.clone() };
                continue;
            }
        }

        match timeout(deadline, socket.recv(&mut buffer)).await {
            Ok(Ok(len)) => {
                debug!("Received {} bytes from {} on attempt {}", len, address, attempt);
                buffer.truncate(len);
                return Ok(buffer);
            }
            Ok(Err(source)) => {
                last_error = QueryError::Io { address: address.clone(), source };
            }
            Err(_) => {
                last_error = QueryError::Timeout { address: address.clone() };
            }
        }
    }

    Err(last_error)
}

async fn resolve_ipv4(endpoint: &Endpoint) -> Result<SocketAddr, QueryError> {
    let address = endpoint.to_string();
    let mut addrs = tokio::net::lookup_host((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(|source| QueryError::Io { address: address.clone(), source })?;

    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or(QueryError::Resolve { address })
}
