// src/protocol/status.rs
use crate::error::QueryError;
use crate::models::endpoint::Endpoint;
use crate::models::server::ServerRecord;
use crate::protocol::client_record::{parse_client_record, BotDetector, Client};
use crate::protocol::fields::split_record;
use crate::protocol::qtv::query_qtv;
use crate::protocol::text::to_plain_text;
use crate::protocol::transport;
use crate::protocol::QueryOptions;
use log::{debug, warn};
use std::collections::BTreeMap;

pub const STATUS_REQUEST: &[u8] = b"\xff\xff\xff\xffstatus 23\n";
pub const STATUS_RESPONSE_HEADER: &[u8] = b"\xff\xff\xff\xffn\\";

/// Polls one server for its full status, then looks up its QTV relay.
///
/// Silence is expected from dead or firewalled servers and is not logged;
/// a reply with the wrong header is.
pub async fn query_server(endpoint: &Endpoint, options: &QueryOptions) -> Result<ServerRecord, QueryError> {
    let response = transport::request(endpoint, STATUS_REQUEST, options.retries, options.timeout).await?;

    let record = match parse_status_response(endpoint, &response, options.bots.as_ref()) {
        Ok(record) => record,
        Err(e) => {
            warn!("{}", e);
            return Err(e);
        }
    };

    let qtv_address = match query_qtv(endpoint, options).await {
        Ok(qtv) => Some(qtv.relay_address),
        Err(e) => {
            debug!("No QTV for {}: {}", endpoint, e);
            None
        }
    };

    Ok(record.with_qtv_address(qtv_address))
}

/// Parses a status reply into a record without any network access.
///
/// The first line holds `\key\value` settings; every following non-empty
/// line is one client row. Rows that fail to parse are skipped.
pub fn parse_status_response(
    endpoint: &Endpoint,
    response: &[u8],
    bots: &dyn BotDetector,
) -> Result<ServerRecord, QueryError> {
    let body = response
        .strip_prefix(STATUS_RESPONSE_HEADER)
        .ok_or_else(|| QueryError::BadHeader { address: endpoint.to_string() })?;

    let mut lines = body.split(|&b| b == b'\n');
    let settings = parse_settings(lines.next().unwrap_or_default());

    let mut players = Vec::new();
    let mut spectators = Vec::new();

    for line in lines.filter(|line| !line.is_empty()) {
        let Some(columns) = split_record(line) else {
            continue;
        };

        match parse_client_record(&columns, bots) {
            Some(Client::Player(player)) => players.push(player),
            Some(Client::Spectator(spectator)) => spectators.push(spectator),
            None => debug!("Skipping client row with {} columns from {}", columns.len(), endpoint),
        }
    }

    Ok(ServerRecord::new(endpoint.clone(), settings, players, spectators))
}

fn parse_settings(line: &[u8]) -> BTreeMap<String, String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let tokens: Vec<&[u8]> = line
        .split(|&b| b == b'\\')
        .filter(|token| !token.is_empty())
        .collect();

    tokens
        .chunks_exact(2)
        .map(|pair| {
            let key = String::from_utf8_lossy(pair[0]).into_owned();
            let value = if key == "hostname" {
                to_plain_text(pair[1])
            } else {
                String::from_utf8_lossy(pair[1]).into_owned()
            };
            (key, value)
        })
        .collect()
}
