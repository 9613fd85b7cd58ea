// src/storage/memory.rs
use crate::models::server::{ServerKind, ServerRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Holds the records of the most recent polling cycle.
#[derive(Debug, Default)]
pub struct ServerStorage {
    servers: RwLock<Vec<ServerRecord>>,
}

impl ServerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a whole cycle; the previous one is dropped.
    pub fn replace(&self, mut servers: Vec<ServerRecord>) {
        servers.sort_by(|a, b| a.address.cmp(&b.address));
        *self.servers.write() = servers;
    }

    pub fn get_servers(&self) -> Vec<ServerRecord> {
        self.servers.read().clone()
    }

    pub fn get_servers_of_kind(&self, kind: ServerKind) -> Vec<ServerRecord> {
        self.servers
            .read()
            .iter()
            .filter(|server| server.kind() == kind)
            .cloned()
            .collect()
    }

    /// Server address to advertised QTV relay, for servers that have one.
    pub fn server_to_qtv(&self) -> BTreeMap<String, String> {
        self.servers
            .read()
            .iter()
            .filter_map(|server| {
                server
                    .qtv_address
                    .as_ref()
                    .map(|qtv| (server.address.to_string(), qtv.clone()))
            })
            .collect()
    }

    pub fn qtv_to_server(&self) -> BTreeMap<String, String> {
        self.server_to_qtv()
            .into_iter()
            .map(|(server, qtv)| (qtv, server))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::endpoint::Endpoint;

    fn record(host: &str, version: &str, qtv: Option<&str>) -> ServerRecord {
        let settings = BTreeMap::from([("*version".to_string(), version.to_string())]);
        ServerRecord::new(Endpoint::new(host, 27500), settings, Vec::new(), Vec::new())
            .with_qtv_address(qtv.map(str::to_string))
    }

    #[test]
    fn replace_discards_previous_cycle() {
        let storage = ServerStorage::new();
        storage.replace(vec![record("10.0.0.2", "MVDSV 0.36", None), record("10.0.0.1", "MVDSV 0.36", None)]);
        assert_eq!(storage.get_servers().len(), 2);
        assert_eq!(storage.get_servers()[0].address.host, "10.0.0.1");

        storage.replace(vec![record("10.0.0.3", "MVDSV 0.36", None)]);
        let servers = storage.get_servers();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].address.host, "10.0.0.3");
    }

    #[test]
    fn filters_by_kind() {
        let storage = ServerStorage::new();
        storage.replace(vec![
            record("10.0.0.1", "MVDSV 0.36", None),
            record("10.0.0.2", "qwfwd 1.2", None),
            record("10.0.0.3", "QTV 1.12", None),
        ]);

        assert_eq!(storage.get_servers_of_kind(ServerKind::GameServer).len(), 1);
        assert_eq!(storage.get_servers_of_kind(ServerKind::Proxy)[0].address.host, "10.0.0.2");
        assert_eq!(storage.get_servers_of_kind(ServerKind::Qtv)[0].address.host, "10.0.0.3");
    }

    #[test]
    fn qtv_maps_go_both_ways() {
        let storage = ServerStorage::new();
        storage.replace(vec![
            record("10.0.0.1", "MVDSV 0.36", Some("qtv.example.com:28000")),
            record("10.0.0.2", "MVDSV 0.36", None),
        ]);

        let forward = storage.server_to_qtv();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward["10.0.0.1:27500"], "qtv.example.com:28000");

        let reverse = storage.qtv_to_server();
        assert_eq!(reverse["qtv.example.com:28000"], "10.0.0.1:27500");
    }
}
