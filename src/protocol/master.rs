// src/protocol/master.rs
use crate::error::QueryError;
use crate::models::endpoint::Endpoint;
use crate::protocol::transport;
use crate::protocol::QueryOptions;
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::io::Cursor;
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::task::JoinSet;

pub const MASTER_REQUEST: [u8; 3] = [0x63, 0x0a, 0x00];
pub const MASTER_RESPONSE_HEADER: [u8; 6] = [0xff, 0xff, 0xff, 0xff, 0x64, 0x0a];

/// Asks one master server for its list of registered game servers.
pub async fn query_master(master: &Endpoint, options: &QueryOptions) -> Result<Vec<Endpoint>, QueryError> {
    let response = transport::request(master, &MASTER_REQUEST, options.retries, options.timeout).await?;
    parse_master_response(master, &response)
}

/// Decodes a master reply: the magic header followed by packed
/// `ipv4 (4 bytes) + port (2 bytes, big endian)` records. A trailing
/// partial record ends the list.
pub fn parse_master_response(master: &Endpoint, response: &[u8]) -> Result<Vec<Endpoint>, QueryError> {
    let payload = response
        .strip_prefix(&MASTER_RESPONSE_HEADER[..])
        .ok_or_else(|| QueryError::BadHeader { address: master.to_string() })?;

    let mut reader = Cursor::new(payload);
    let mut addresses = Vec::with_capacity(payload.len() / 6);

    loop {
        let ip = match reader.read_u32::<BigEndian>() {
            Ok(ip) => Ipv4Addr::from(ip),
            Err(_) => break,
        };
        let port = match reader.read_u16::<BigEndian>() {
            Ok(port) => port,
            Err(_) => break,
        };

        addresses.push(Endpoint::from(SocketAddrV4::new(ip, port)));
    }

    Ok(addresses)
}

/// Queries every master concurrently and returns the union of their lists,
/// each endpoint once. A failing master only contributes nothing.
pub async fn discover_addresses(masters: &[Endpoint], options: &QueryOptions) -> Vec<Endpoint> {
    let mut tasks = JoinSet::new();

    for master in masters.iter().cloned() {
        let options = options.clone();
        tasks.spawn(async move {
            let result = query_master(&master, &options).await;
            (master, result)
        });
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((master, Ok(addresses))) => {
                debug!("Master {} returned {} addresses", master, addresses.len());
                for address in addresses {
                    if seen.insert(address.clone()) {
                        unique.push(address);
                    }
                }
            }
            Ok((_, Err(e))) => warn!("{}", e),
            Err(e) => error!("Master query task failed: {}", e),
        }
    }

    info!("Discovered {} unique server addresses from {} masters", unique.len(), masters.len());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> Endpoint {
        Endpoint::new("master.example.com", 27000)
    }

    fn response(records: &[u8]) -> Vec<u8> {
        let mut bytes = MASTER_RESPONSE_HEADER.to_vec();
        bytes.extend_from_slice(records);
        bytes
    }

    #[test]
    fn decodes_packed_records() {
        let bytes = response(&[
            192, 168, 1, 10, 0x6b, 0x6c, // 27500
            10, 0, 0, 1, 0x6d, 0x60, // 28000
        ]);

        let addresses = parse_master_response(&master(), &bytes).unwrap();
        assert_eq!(
            addresses,
            vec![Endpoint::new("192.168.1.10", 27500), Endpoint::new("10.0.0.1", 28000)]
        );
    }

    #[test]
    fn trailing_partial_record_is_dropped() {
        for extra in 1..6u8 {
            let mut records = vec![1, 2, 3, 4, 0x6b, 0x6c];
            records.extend((0..extra).map(|i| i + 100));

            let addresses = parse_master_response(&master(), &response(&records)).unwrap();
            assert_eq!(addresses.len(), 1, "with {} trailing bytes", extra);
        }
    }

    #[test]
    fn header_only_is_an_empty_list() {
        assert!(parse_master_response(&master(), &response(&[])).unwrap().is_empty());
    }

    #[test]
    fn bad_header_is_rejected() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x64, 0x00, 1, 2, 3, 4, 0x6b, 0x6c];
        let err = parse_master_response(&master(), &bytes).unwrap_err();

        assert!(matches!(err, QueryError::BadHeader { .. }));
        assert_eq!(err.address(), "master.example.com:27000");
    }

    #[test]
    fn short_response_is_rejected() {
        let err = parse_master_response(&master(), &[0xff, 0xff]).unwrap_err();
        assert!(matches!(err, QueryError::BadHeader { .. }));
    }
}
