// src/protocol/qtv.rs
use crate::error::QueryError;
use crate::models::endpoint::Endpoint;
use crate::models::server::QtvRecord;
use crate::protocol::fields::split_record;
use crate::protocol::transport;
use crate::protocol::QueryOptions;

pub const QTV_REQUEST: &[u8] = b"\xff\xff\xff\xffstatus 32\n";
pub const QTV_RESPONSE_HEADER: &[u8] = b"\xff\xff\xff\xffnqtv";

// The record starts at "qtv", one byte into the header's tail.
const RECORD_OFFSET: usize = 5;
const INDEX_TITLE: usize = 2;
const INDEX_ADDRESS: usize = 3;

/// Asks a game server for the QTV relay it advertises.
///
/// Many servers ignore this request or answer with a regular status reply,
/// so callers are expected to treat any error as "no relay".
pub async fn query_qtv(endpoint: &Endpoint, options: &QueryOptions) -> Result<QtvRecord, QueryError> {
    let response = transport::request(endpoint, QTV_REQUEST, options.retries, options.timeout).await?;
    parse_qtv_response(endpoint, &response)
}

pub fn parse_qtv_response(endpoint: &Endpoint, response: &[u8]) -> Result<QtvRecord, QueryError> {
    let malformed = |reason: &str| QueryError::Malformed {
        address: endpoint.to_string(),
        reason: reason.to_string(),
    };

    if !response.starts_with(QTV_RESPONSE_HEADER) {
        return Err(QueryError::BadHeader { address: endpoint.to_string() });
    }

    let body = &response[RECORD_OFFSET..];
    let line = body.split(|&b| b == b'\n').next().unwrap_or_default();
    let fields = split_record(line).ok_or_else(|| malformed("invalid qtv record"))?;

    if fields.len() <= INDEX_ADDRESS {
        return Err(malformed("too few qtv fields"));
    }
    if fields[INDEX_ADDRESS].is_empty() {
        return Err(malformed("qtv address not configured"));
    }

    Ok(QtvRecord {
        address: endpoint.clone(),
        title: String::from_utf8_lossy(&fields[INDEX_TITLE]).into_owned(),
        relay_address: String::from_utf8_lossy(&fields[INDEX_ADDRESS]).into_owned(),
    })
}
