// src/config.rs
use crate::models::endpoint::Endpoint;
use crate::protocol::client_record::{BotPolicy, DEFAULT_BOT_NAMES, DEFAULT_BOT_PING};
use crate::protocol::QueryOptions;
use lazy_static::lazy_static;
use log::warn;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    static ref DEFAULT_MASTER_SERVERS: Vec<Endpoint> = vec![
        Endpoint::new("master.quakeworld.nu", 27000),
        Endpoint::new("master.quakeservers.net", 27000),
        Endpoint::new("qwmaster.fodquake.net", 27000),
        Endpoint::new("qwmaster.ocrana.de", 27000),
    ];
}

pub const DEFAULT_GEO_DB_URL: &str = "https://raw.githubusercontent.com/vikpe/qw-servers-geoip/main/ip_to_geo.json";

#[derive(Debug, Clone)]
pub struct Config {
    // Discovery and polling
    pub master_servers: Vec<Endpoint>,
    pub retries: u32,
    pub timeout_ms: u64,
    pub max_concurrent_queries: usize,
    pub update_interval_secs: u64,

    // Bot heuristics
    pub bot_names: Vec<String>,
    pub bot_ping: Option<i32>,

    // Geo enrichment
    pub geo_db_path: String,
    pub geo_db_url: String,

    // HTTP
    pub bind_address: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_servers: DEFAULT_MASTER_SERVERS.clone(),
            retries: 3,
            timeout_ms: 500,
            max_concurrent_queries: 1024,
            update_interval_secs: 30,
            bot_names: DEFAULT_BOT_NAMES.iter().map(|s| s.to_string()).collect(),
            bot_ping: Some(DEFAULT_BOT_PING),
            geo_db_path: "ip_to_geo.json".to_string(),
            geo_db_url: DEFAULT_GEO_DB_URL.to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, keeping the default for keys
    /// that are missing or do not parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let master_servers = lookup("MASTER_SERVERS_FILE")
            .and_then(|path| read_master_servers_file(&path))
            .or_else(|| lookup("MASTER_SERVERS").and_then(|list| parse_list::<Endpoint>(&list)))
            .unwrap_or(defaults.master_servers);

        let bot_ping = match parsed(&lookup, "BOT_PING") {
            Some(ping) if ping < 0 => None,
            Some(ping) => Some(ping),
            None => defaults.bot_ping,
        };

        Self {
            master_servers,
            retries: parsed(&lookup, "QUERY_RETRIES").unwrap_or(defaults.retries),
            timeout_ms: parsed(&lookup, "QUERY_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
            max_concurrent_queries: parsed(&lookup, "MAX_CONCURRENT_QUERIES").unwrap_or(defaults.max_concurrent_queries),
            update_interval_secs: parsed(&lookup, "UPDATE_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.update_interval_secs),
            bot_names: lookup("BOT_NAMES")
                .and_then(|list| parse_list::<String>(&list))
                .unwrap_or(defaults.bot_names),
            bot_ping,
            geo_db_path: lookup("GEO_DB_PATH").unwrap_or(defaults.geo_db_path),
            geo_db_url: lookup("GEO_DB_URL").unwrap_or(defaults.geo_db_url),
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
        }
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::new(self.retries, Duration::from_millis(self.timeout_ms))
            .with_max_concurrency(self.max_concurrent_queries)
            .with_bots(Arc::new(BotPolicy::new(self.bot_names.clone(), self.bot_ping)))
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

/// Comma-separated list; `None` if empty or any entry fails to parse.
fn parse_list<T: FromStr>(list: &str) -> Option<Vec<T>> {
    let items = list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().ok())
        .collect::<Option<Vec<T>>>()?;

    (!items.is_empty()).then_some(items)
}

fn read_master_servers_file(path: &str) -> Option<Vec<Endpoint>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Unable to read {}: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(masters) => Some(masters),
        Err(e) => {
            warn!("Unable to parse {}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::client_record::BotDetector;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.master_servers.len(), 4);
        assert_eq!(config.retries, 3);
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.bot_ping, Some(10));
        assert_eq!(config.bind(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MASTER_SERVERS", "a.example.com:27000, b.example.com:27001"),
            ("QUERY_RETRIES", "5"),
            ("QUERY_TIMEOUT_MS", "250"),
            ("MAX_CONCURRENT_QUERIES", "0"),
            ("BOT_NAMES", "bot1,bot2"),
            ("BOT_PING", "-1"),
            ("PORT", "8080"),
        ]));

        assert_eq!(
            config.master_servers,
            vec![Endpoint::new("a.example.com", 27000), Endpoint::new("b.example.com", 27001)]
        );
        assert_eq!(config.retries, 5);
        assert_eq!(config.bot_names, vec!["bot1", "bot2"]);
        assert_eq!(config.bot_ping, None);
        assert_eq!(config.port, 8080);

        let options = config.query_options();
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.max_concurrency, 0);
        assert!(options.bots.is_bot("bot2", 50));
        assert!(!options.bots.is_bot("human", 10));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("MASTER_SERVERS", "not-an-endpoint"),
            ("QUERY_RETRIES", "many"),
            ("UPDATE_INTERVAL_SECS", "0"),
        ]));

        assert_eq!(config.master_servers.len(), 4);
        assert_eq!(config.retries, 3);
        assert_eq!(config.update_interval_secs, 30);
    }

    #[test]
    fn master_servers_file_wins() {
        let dir = temp_dir::TempDir::with_prefix("qwscrape-config").expect("Failed to create temp dir");
        let path = dir.path().join("master_servers.json");
        std::fs::write(&path, r#"["qw.example.com:27000"]"#).unwrap();
        let path = path.to_string_lossy().into_owned();

        let config = Config::from_lookup(lookup(&[
            ("MASTER_SERVERS_FILE", path.as_str()),
            ("MASTER_SERVERS", "other.example.com:27000"),
        ]));
        assert_eq!(config.master_servers, vec![Endpoint::new("qw.example.com", 27000)]);
    }
}
