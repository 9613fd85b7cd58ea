// src/models/server.rs
use crate::models::endpoint::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub name_int: Vec<u32>,
    pub team: String,
    pub team_int: Vec<u32>,
    pub skin: String,
    pub colors: [i32; 2],
    pub frags: i32,
    pub ping: i32,
    pub time: i32,
    pub is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spectator {
    pub name: String,
    pub name_int: Vec<u32>,
    pub is_bot: bool,
}

/// One successfully polled server. Counts always mirror the list lengths,
/// so they are only set through [`ServerRecord::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub address: Endpoint,
    pub title: String,
    pub map: String,
    pub max_players: i32,
    pub max_spectators: i32,
    pub num_players: usize,
    pub num_spectators: usize,
    pub players: Vec<Player>,
    pub spectators: Vec<Spectator>,
    pub settings: BTreeMap<String, String>,
    pub qtv_address: Option<String>,
}

impl ServerRecord {
    pub fn new(
        address: Endpoint,
        settings: BTreeMap<String, String>,
        players: Vec<Player>,
        spectators: Vec<Spectator>,
    ) -> Self {
        let title = settings.get("hostname").cloned().unwrap_or_default();
        let map = settings.get("map").cloned().unwrap_or_default();
        let max_players = settings.get("maxclients").map(|v| parse_int(v)).unwrap_or(0);
        let max_spectators = settings.get("maxspectators").map(|v| parse_int(v)).unwrap_or(0);

        Self {
            address,
            title,
            map,
            max_players,
            max_spectators,
            num_players: players.len(),
            num_spectators: spectators.len(),
            players,
            spectators,
            settings,
            qtv_address: None,
        }
    }

    pub fn with_qtv_address(mut self, qtv_address: Option<String>) -> Self {
        self.qtv_address = qtv_address;
        self
    }

    pub fn kind(&self) -> ServerKind {
        ServerKind::from_version(self.settings.get("*version").map(String::as_str))
    }
}

/// Transient result of the QTV sub-protocol; only its address survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QtvRecord {
    pub address: Endpoint,
    pub title: String,
    pub relay_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerKind {
    GameServer,
    Proxy,
    Qtv,
}

impl ServerKind {
    pub fn from_version(version: Option<&str>) -> Self {
        let version = version.unwrap_or("").trim().to_ascii_lowercase();

        if version.starts_with("qwfwd") {
            ServerKind::Proxy
        } else if version.starts_with("qtv") {
            ServerKind::Qtv
        } else {
            ServerKind::GameServer
        }
    }
}

/// Best-effort integer parsing; anything unparsable, padded or out of
/// range is zero.
pub fn parse_int(value: &str) -> i32 {
    value.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn derives_header_fields_from_settings() {
        let record = ServerRecord::new(
            Endpoint::new("1.2.3.4", 27500),
            settings(&[
                ("hostname", "Test Server"),
                ("map", "dm3"),
                ("maxclients", "8"),
                ("maxspectators", "x"),
            ]),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(record.title, "Test Server");
        assert_eq!(record.map, "dm3");
        assert_eq!(record.max_players, 8);
        assert_eq!(record.max_spectators, 0);
        assert_eq!(record.num_players, 0);
        assert_eq!(record.qtv_address, None);
    }

    #[test]
    fn classifies_by_version() {
        assert_eq!(ServerKind::from_version(Some("MVDSV 0.36")), ServerKind::GameServer);
        assert_eq!(ServerKind::from_version(Some("qwfwd 1.2")), ServerKind::Proxy);
        assert_eq!(ServerKind::from_version(Some("QTV 1.12")), ServerKind::Qtv);
        assert_eq!(ServerKind::from_version(None), ServerKind::GameServer);
    }

    #[test]
    fn parse_int_defaults_to_zero() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("-3"), -3);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("12abc"), 0);
        assert_eq!(parse_int(" 5"), 0);
        assert_eq!(parse_int("5 "), 0);
        assert_eq!(parse_int("+7"), 7);
        assert_eq!(parse_int("3000000000"), 0);
    }
}
